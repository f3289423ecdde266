use mart_connect_api::{
    db::{create_orm_conn, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

struct SeedUser<'a> {
    email: &'a str,
    password: &'a str,
    role: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
    shop: Option<(&'a str, &'a str)>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;

    let (pool, orm) = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(
        &pool,
        SeedUser {
            email: "admin@example.com",
            password: "admin123",
            role: "admin",
            first_name: "Store",
            last_name: "Admin",
            phone: "9000000001",
            shop: None,
        },
    )
    .await?;
    let seller_id = ensure_user(
        &pool,
        SeedUser {
            email: "seller@example.com",
            password: "seller123",
            role: "seller",
            first_name: "Ravi",
            last_name: "Kumar",
            phone: "9000000002",
            shop: Some(("Ravi General Store", "12 Market Road, Pune")),
        },
    )
    .await?;
    let customer_id = ensure_user(
        &pool,
        SeedUser {
            email: "customer@example.com",
            password: "customer123",
            role: "customer",
            first_name: "Asha",
            last_name: "Patil",
            phone: "9000000003",
            shop: None,
        },
    )
    .await?;

    let staples = ensure_category(&pool, "Staples", "Rice, flour and pulses").await?;
    let dairy = ensure_category(&pool, "Dairy", "Milk, curd and paneer").await?;
    seed_products(&pool, seller_id, staples, dairy).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Seller ID: {seller_id}, Customer ID: {customer_id}"
    );
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, user: SeedUser<'_>) -> anyhow::Result<Uuid> {
    let password_hash =
        hash_password(user.password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let (shop_name, shop_address) = user.shop.unzip();

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role, first_name, last_name, phone, shop_name, shop_address)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.email)
    .bind(password_hash)
    .bind(user.role)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.phone)
    .bind(shop_name)
    .bind(shop_address)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {} (role={})", user.email, user.role);
    Ok(id)
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_products(
    pool: &sqlx::PgPool,
    seller_id: Uuid,
    staples: Uuid,
    dairy: Uuid,
) -> anyhow::Result<()> {
    // Prices are in paise.
    let products = vec![
        ("Basmati Rice", "Long grain, aged one year", staples, 12_000_i64, "kg", 80),
        ("Toor Dal", "Unpolished split pigeon peas", staples, 16_500, "kg", 40),
        ("Whole Wheat Atta", "Stone ground", staples, 5_200, "kg", 6),
        ("Toned Milk", "Pasteurised, 500 ml pouch", dairy, 2_800, "pack", 120),
        ("Fresh Paneer", "200 g block", dairy, 9_000, "pack", 8),
    ];

    for (name, desc, category_id, price, unit, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, seller_id, category_id, name, description, price, unit, stock)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (
                SELECT 1 FROM products WHERE seller_id = $2 AND name = $4
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(category_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(unit)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
