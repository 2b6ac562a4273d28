use sqlx::{FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Partner, PropertyContext, PropertyLocation, Role, RoleStatistics, ServiceDetail, ServiceType, User},
    order_objects::ServiceQueryFilter,
};

const SERVICE_DETAIL_SELECT: &str = r#"
    SELECT
        s.*,
        p.name AS partner_name,
        p.phone AS partner_phone,
        p.email AS partner_email,
        p.description AS partner_description
    FROM services s
    LEFT JOIN partners p ON s.partner_id = p.id
"#;

pub async fn fetch_partner(id: i64, conn: &mut SqliteConnection) -> Result<Option<Partner>, sqlx::Error> {
    let partner = sqlx::query_as("SELECT * FROM partners WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(partner)
}

/// Active partners, optionally narrowed to one service type, ordered by name.
pub async fn fetch_partners(
    service_type: Option<ServiceType>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Partner>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM partners WHERE is_active = TRUE");
    if let Some(service_type) = service_type {
        builder.push(" AND service_type = ");
        builder.push_bind(service_type);
    }
    builder.push(" ORDER BY name");
    let partners = builder.build_query_as::<Partner>().fetch_all(conn).await?;
    Ok(partners)
}

/// Available services matching the filter, ordered by name.
pub async fn fetch_services(
    filter: ServiceQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceDetail>, sqlx::Error> {
    let mut builder = QueryBuilder::new(SERVICE_DETAIL_SELECT);
    builder.push(" WHERE s.is_available = TRUE");
    if let Some(service_type) = filter.service_type {
        builder.push(" AND s.service_type = ");
        builder.push_bind(service_type);
    }
    if let Some(partner_id) = filter.partner_id {
        builder.push(" AND s.partner_id = ");
        builder.push_bind(partner_id);
    }
    builder.push(" ORDER BY s.name");
    let services = builder.build_query_as::<ServiceDetail>().fetch_all(conn).await?;
    Ok(services)
}

pub async fn fetch_service(id: i64, conn: &mut SqliteConnection) -> Result<Option<ServiceDetail>, sqlx::Error> {
    let service = sqlx::query_as(&format!("{SERVICE_DETAIL_SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(service)
}

pub async fn fetch_users(role: Option<Role>, conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    let mut builder =
        QueryBuilder::new("SELECT id, email, first_name, last_name, phone, role, created_at FROM users");
    if let Some(role) = role {
        builder.push(" WHERE role = ");
        builder.push_bind(role);
    }
    builder.push(" ORDER BY created_at DESC");
    let users = builder.build_query_as::<User>().fetch_all(conn).await?;
    Ok(users)
}

#[derive(Debug, FromRow)]
struct RoleCount {
    role: Role,
    count: i64,
}

/// Role counts over the whole user table, never filtered.
pub async fn role_statistics(conn: &mut SqliteConnection) -> Result<RoleStatistics, sqlx::Error> {
    let counts: Vec<RoleCount> =
        sqlx::query_as("SELECT role, COUNT(*) AS count FROM users GROUP BY role").fetch_all(&mut *conn).await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(conn).await?;
    let counts = counts.into_iter().map(|c| (c.role, c.count)).collect::<Vec<_>>();
    Ok(RoleStatistics::from_counts(total, &counts))
}

pub async fn fetch_property_location(
    property_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<PropertyLocation>, sqlx::Error> {
    let location = sqlx::query_as("SELECT latitude, longitude FROM properties WHERE id = $1")
        .bind(property_id)
        .fetch_optional(conn)
        .await?;
    Ok(location)
}

pub async fn fetch_property_context(
    property_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<PropertyContext>, sqlx::Error> {
    let context = sqlx::query_as("SELECT name, address FROM properties WHERE id = $1")
        .bind(property_id)
        .fetch_optional(conn)
        .await?;
    Ok(context)
}
