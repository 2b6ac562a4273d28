use concierge_engine::SqliteDatabase;

/// A fresh, fully migrated in-memory database. One connection keeps the in-memory store alive for
/// the duration of the test.
pub async fn new_db() -> SqliteDatabase {
    dotenvy::dotenv().ok();
    let _ = env_logger::try_init();
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database")
}

/// Seeds the fixed cast used across the integration tests:
///
/// * users: Alice (guest, #1), Bob (host, #2), Carol (host, #3), Dave (admin, #4), Erin (guest, #5)
/// * properties: Seaview Villa (#1, hosted by Bob), Hilltop Cottage (#2, hosted by Carol, no
///   coordinates)
/// * partners: Island Taxi (#5, 10%), Sparkle Clean (#6, $25.00 fixed), Gone Fishing (#7, no terms)
/// * services: Airport Run (#1, Island Taxi)
/// * bookings: #7 (Alice at Seaview Villa)
pub async fn seed(db: &SqliteDatabase) {
    let pool = db.pool();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, first_name, last_name, role) VALUES
            (1, 'alice@example.com', 'Alice', 'Archer', 'guest'),
            (2, 'bob@example.com', 'Bob', 'Baker', 'host'),
            (3, 'carol@example.com', 'Carol', 'Cook', 'host'),
            (4, 'dave@example.com', 'Dave', 'Dunn', 'admin'),
            (5, 'erin@example.com', 'Erin', 'Eriksen', 'guest');
        "#,
    )
    .execute(pool)
    .await
    .expect("seeding users failed");
    sqlx::query(
        r#"
        INSERT INTO properties (id, host_id, name, address, latitude, longitude) VALUES
            (1, 2, 'Seaview Villa', '1 Shore Road', 36.39, 25.46),
            (2, 3, 'Hilltop Cottage', NULL, NULL, NULL);
        "#,
    )
    .execute(pool)
    .await
    .expect("seeding properties failed");
    sqlx::query(
        r#"
        INSERT INTO partners (id, name, phone, service_type, commission_percentage, commission_fixed) VALUES
            (5, 'Island Taxi', '555-0105', 'taxi', 10.0, 0),
            (6, 'Sparkle Clean', NULL, 'cleaning', 0.0, 2500),
            (7, 'Gone Fishing', NULL, 'excursion', 0.0, 0);
        "#,
    )
    .execute(pool)
    .await
    .expect("seeding partners failed");
    sqlx::query("INSERT INTO services (id, partner_id, name, service_type) VALUES (1, 5, 'Airport Run', 'taxi')")
        .execute(pool)
        .await
        .expect("seeding services failed");
    sqlx::query("INSERT INTO bookings (id, guest_id, property_id) VALUES (7, 1, 1)")
        .execute(pool)
        .await
        .expect("seeding bookings failed");
}
