use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};
use storefront::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{auth::LoginRequest, orders::CreateOrderRequest},
    error::AppError,
    models::{CartLineItem, Customer, Payment, PaymentMethod, PaymentStatus},
    repository::{PostgresRepository, StorefrontRepository},
    services::{auth_service, order_service},
};

// Integration flow against Postgres: login registers, orders round-trip
// through JSON columns, deletes are idempotent.
#[tokio::test]
async fn login_create_list_delete_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let repo = setup_repo(&database_url).await?;

    let login = auth_service::login_user(
        &repo,
        LoginRequest {
            email: "flow@example.com".into(),
            password: "secret".into(),
        },
    )
    .await?;
    assert!(login.success);

    let wrong = auth_service::login_user(
        &repo,
        LoginRequest {
            email: "flow@example.com".into(),
            password: "nope".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let first = order_service::create_order(&repo, order(1_700_000_000_000, 1)).await?;
    let second = order_service::create_order(&repo, order(1_700_000_000_001, 2)).await?;
    assert_eq!(first.total, Decimal::new(99999, 2));
    assert_eq!(second.items[0].quantity, 2);

    let listed = order_service::list_orders(&repo).await?;
    let ids: Vec<i64> = listed.iter().map(|o| o.order_id).collect();
    assert_eq!(ids, vec![1_700_000_000_001, 1_700_000_000_000]);
    assert_eq!(listed[0].customer.name, "Edsger");

    assert!(order_service::delete_order(&repo, 1_700_000_000_000).await?.success);
    assert!(order_service::delete_order(&repo, 42).await?.success);
    assert_eq!(repo.list_orders().await?.len(), 1);

    Ok(())
}

fn order(order_id: i64, quantity: u32) -> CreateOrderRequest {
    let price = Decimal::new(99999, 2);
    CreateOrderRequest {
        order_id,
        date: "1/1/2026".into(),
        customer: Customer {
            name: "Edsger".into(),
            email: "edsger@example.com".into(),
            address: "Austin".into(),
        },
        items: vec![CartLineItem {
            id: 1,
            name: "Laptop".into(),
            price,
            image: "https://via.placeholder.com/250x200?text=Laptop".into(),
            description: "High-performance laptop".into(),
            quantity,
        }],
        total: price * Decimal::from(quantity),
        payment: Payment {
            method: PaymentMethod::CashOnDelivery,
            card_number: None,
            status: PaymentStatus::Completed,
        },
    }
}

async fn setup_repo(database_url: &str) -> anyhow::Result<PostgresRepository> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    let orm = create_orm_conn(pool);

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, orders, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(PostgresRepository::new(orm))
}
