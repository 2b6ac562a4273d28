use log::trace;
use sqlx::{types::Json, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderDetail, OrderStatus},
    order_objects::{CommissionQueryFilter, CommissionRow, ExportRecord, MonthlyCommissionRow, OrderQueryFilter},
};

/// The enriched order projection. Every order query joins the same four display names so that the
/// UI never has to chase ids.
const ORDER_DETAIL_SELECT: &str = r#"
    SELECT
        o.*,
        u.first_name AS guest_first_name,
        u.last_name AS guest_last_name,
        u.email AS guest_email,
        p.name AS property_name,
        pt.name AS partner_name,
        s.name AS service_name
    FROM orders o
    LEFT JOIN users u ON o.guest_id = u.id
    LEFT JOIN properties p ON o.property_id = p.id
    LEFT JOIN partners pt ON o.partner_id = pt.id
    LEFT JOIN services s ON o.service_id = s.id
"#;

/// Inserts a new order with status `pending`. The commission fields must already hold the resolved
/// snapshot; this function stores what it is given.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                guest_id,
                property_id,
                service_id,
                partner_id,
                service_type,
                price,
                commission_percentage,
                commission_amount,
                order_details,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            RETURNING *;
        "#,
    )
    .bind(order.guest_id)
    .bind(order.property_id)
    .bind(order.service_id)
    .bind(order.partner_id)
    .bind(order.service_type)
    .bind(order.price)
    .bind(order.commission_percentage)
    .bind(order.commission_amount)
    .bind(order.order_details.map(Json))
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Fetches one order with its joined display fields.
pub async fn fetch_order_detail(id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderDetail>, sqlx::Error> {
    let detail = sqlx::query_as(&format!("{ORDER_DETAIL_SELECT} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(detail)
}

/// All orders placed by one guest, newest first.
pub async fn fetch_orders_for_guest(
    guest_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetail>, sqlx::Error> {
    let orders = sqlx::query_as(&format!("{ORDER_DETAIL_SELECT} WHERE o.guest_id = $1 ORDER BY o.created_at DESC"))
        .bind(guest_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Fetches orders according to the criteria in the `OrderQueryFilter`, newest first.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetail>, sqlx::Error> {
    let mut builder = QueryBuilder::new(ORDER_DETAIL_SELECT);
    push_order_filters(&mut builder, &query);
    builder.push(" ORDER BY o.created_at DESC");
    trace!("🧾️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<OrderDetail>().fetch_all(conn).await?;
    trace!("🧾️ Order search returned {} rows", orders.len());
    Ok(orders)
}

/// The flat export projection, with the same filtering as [`search_orders`].
pub async fn export_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<ExportRecord>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT
        o.id,
        o.created_at AS order_date,
        u.first_name AS guest_first_name,
        u.last_name AS guest_last_name,
        u.email AS guest_email,
        p.name AS property_name,
        pt.name AS partner_name,
        s.name AS service_name,
        o.service_type,
        o.status,
        o.price,
        o.commission_percentage,
        o.commission_amount
    FROM orders o
    LEFT JOIN users u ON o.guest_id = u.id
    LEFT JOIN properties p ON o.property_id = p.id
    LEFT JOIN partners pt ON o.partner_id = pt.id
    LEFT JOIN services s ON o.service_id = s.id
"#,
    );
    push_order_filters(&mut builder, &query);
    builder.push(" ORDER BY o.created_at DESC");
    trace!("🧾️ Executing export query: {}", builder.sql());
    let records = builder.build_query_as::<ExportRecord>().fetch_all(conn).await?;
    Ok(records)
}

fn push_order_filters(builder: &mut QueryBuilder<'_, sqlx::Sqlite>, query: &OrderQueryFilter) {
    if query.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(partner_id) = query.partner_id {
        where_clause.push("o.partner_id = ");
        where_clause.push_bind_unseparated(partner_id);
    }
    if let Some(service_type) = query.service_type {
        where_clause.push("o.service_type = ");
        where_clause.push_bind_unseparated(service_type);
    }
    if let Some(status) = query.status {
        where_clause.push("o.status = ");
        where_clause.push_bind_unseparated(status);
    }
    if let Some(since) = query.since {
        where_clause.push("DATE(o.created_at) >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("DATE(o.created_at) <= ");
        where_clause.push_bind_unseparated(until);
    }
}

/// Sets the order's status. The completion timestamp is coupled to the status in a single
/// statement: it is stamped on `completed` and cleared on everything else, including transitions
/// *away* from `completed`.
pub async fn update_order_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let result = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = $1,
                completed_at = CASE WHEN $1 = 'completed' THEN CURRENT_TIMESTAMP ELSE NULL END
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(result)
}

/// Commission aggregates over completed orders, grouped by (partner, service type), highest
/// commission first. Date bounds apply to the completion date.
pub async fn commission_breakdown(
    query: CommissionQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<CommissionRow>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT
        pt.id AS partner_id,
        pt.name AS partner_name,
        o.service_type AS service_type,
        COUNT(o.id) AS total_orders,
        SUM(o.price) AS total_revenue,
        SUM(o.commission_amount) AS total_commission,
        AVG(o.commission_percentage) AS avg_commission_percentage
    FROM orders o
    JOIN partners pt ON o.partner_id = pt.id
    WHERE o.status = 'completed'
"#,
    );
    if let Some(partner_id) = query.partner_id {
        builder.push(" AND pt.id = ");
        builder.push_bind(partner_id);
    }
    if let Some(since) = query.since {
        builder.push(" AND DATE(o.completed_at) >= ");
        builder.push_bind(since);
    }
    if let Some(until) = query.until {
        builder.push(" AND DATE(o.completed_at) <= ");
        builder.push_bind(until);
    }
    builder.push(" GROUP BY pt.id, pt.name, o.service_type ORDER BY total_commission DESC");
    trace!("🧾️ Executing commission query: {}", builder.sql());
    let rows = builder.build_query_as::<CommissionRow>().fetch_all(conn).await?;
    Ok(rows)
}

/// Per-partner, per-month aggregates over completed orders in one calendar year.
pub async fn monthly_commissions(
    year: i32,
    partner_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyCommissionRow>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT
        pt.id AS partner_id,
        pt.name AS partner_name,
        CAST(strftime('%m', o.completed_at) AS INTEGER) AS month,
        COUNT(o.id) AS order_count,
        SUM(o.price) AS revenue,
        SUM(o.commission_amount) AS commission
    FROM orders o
    JOIN partners pt ON o.partner_id = pt.id
    WHERE o.status = 'completed' AND CAST(strftime('%Y', o.completed_at) AS INTEGER) =
"#,
    );
    builder.push_bind(year);
    if let Some(partner_id) = partner_id {
        builder.push(" AND pt.id = ");
        builder.push_bind(partner_id);
    }
    builder.push(" GROUP BY pt.id, pt.name, month ORDER BY month, pt.name");
    let rows = builder.build_query_as::<MonthlyCommissionRow>().fetch_all(conn).await?;
    Ok(rows)
}
