use mart_connect_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        areas::CreateAreaRequest,
        auth::{LoginRequest, RegisterRequest},
        cart::{AddToCartRequest, UpdateCartQuantityRequest},
        categories::{CategoryQuery, CreateCategoryRequest},
        orders::{CheckoutRequest, CheckoutResult, PayOrderRequest, UpdateOrderStatusRequest},
        products::{CreateProductImageRequest, CreateProductRequest, StockAdjustRequest},
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{OrderStatus, PaymentStatus, Product, Role},
    routes::params::{LowStockQuery, OrderListQuery, ProductQuery},
    services::{
        area_service, auth_service, cart_service, category_service, order_service,
        product_image_service, product_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Each test creates its own users, category and products, so runs never
// collide and no table is truncated.

#[tokio::test]
async fn checkout_splits_by_seller_and_drives_order_lifecycle() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller_a = register(&state, Role::Seller).await?;
    let seller_b = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;

    let category = create_category(&state, &admin).await?;
    let rice = create_product(&state, &seller_a, category, "Rice", 12_000, 10).await?;
    let dal = create_product(&state, &seller_a, category, "Dal", 16_500, 5).await?;
    let milk = create_product(&state, &seller_b, category, "Milk", 2_800, 20).await?;

    let area = area_service::create_area(
        &state,
        &customer,
        CreateAreaRequest {
            area_name: "Baner".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411045".into(),
        },
    )
    .await?
    .data
    .unwrap();

    add(&state, &customer, rice.id, 2).await?;
    add(&state, &customer, rice.id, 1).await?;
    add(&state, &customer, dal.id, 2).await?;
    add(&state, &customer, milk.id, 4).await?;

    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 3);
    assert_eq!(cart.item_count, 9);
    let expected_total = 3 * 12_000 + 2 * 16_500 + 4 * 2_800;
    assert_eq!(cart.total, expected_total);

    let validation = cart_service::validate_cart(&state, &customer).await?.data.unwrap();
    assert!(validation.valid);

    let result = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            area_id: area.id,
            payment_method: Some("cod".into()),
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(result.orders.len(), 2);
    assert_eq!(result.grand_total, expected_total);
    let order_sum: i64 = result.orders.iter().map(|o| o.order.total_amount).sum();
    assert_eq!(order_sum, expected_total);

    let order_a = result
        .orders
        .iter()
        .find(|o| o.order.seller_id == seller_a.user_id)
        .expect("order for seller a");
    let order_b = result
        .orders
        .iter()
        .find(|o| o.order.seller_id == seller_b.user_id)
        .expect("order for seller b");
    assert_eq!(order_a.order.total_amount, 3 * 12_000 + 2 * 16_500);
    assert_eq!(order_a.items.len(), 2);
    assert_eq!(order_b.order.total_amount, 4 * 2_800);
    assert_eq!(order_a.order.status, OrderStatus::Pending);
    assert_eq!(order_a.order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(
        order_a.order.delivery_address,
        "Baner, Pune, Maharashtra - 411045"
    );
    assert!(order_a.order.invoice_number.starts_with("INV-"));

    assert_eq!(stock_of(&state, rice.id).await?, 7);
    assert_eq!(stock_of(&state, dal.id).await?, 3);
    assert_eq!(stock_of(&state, milk.id).await?, 16);

    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert!(cart.items.is_empty());

    // Pay, then ship as the seller.
    let paid = order_service::pay_order(
        &state,
        &customer,
        order_a.order.id,
        PayOrderRequest {
            payment_method: Some("upi".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.order.status, OrderStatus::Paid);
    assert_eq!(paid.order.payment_status, PaymentStatus::Paid);
    assert!(paid.order.paid_at.is_some());

    let again =
        order_service::pay_order(&state, &customer, order_a.order.id, PayOrderRequest::default())
            .await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let by_customer = order_service::update_order_status(
        &state,
        &customer,
        order_a.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await;
    assert!(matches!(by_customer, Err(AppError::Forbidden)));

    let shipped = order_service::update_order_status(
        &state,
        &seller_a,
        order_a.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(shipped.order.status, OrderStatus::Shipped);

    let late_cancel = order_service::cancel_order(&state, &customer, order_a.order.id).await;
    assert!(matches!(late_cancel, Err(AppError::BadRequest(_))));

    // Seller b cancels the unpaid order and the milk goes back on the shelf.
    let cancelled = order_service::cancel_order(&state, &seller_b, order_b.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(stock_of(&state, milk.id).await?, 20);

    // Visibility is scoped to the parties of an order.
    let hidden = order_service::get_order(&state, &seller_b, order_a.order.id).await;
    assert!(matches!(hidden, Err(AppError::NotFound)));
    let visible = order_service::get_order(&state, &admin, order_a.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(visible.items.len(), 2);

    let seller_orders = order_service::list_orders(&state, &seller_a, OrderListQuery::default())
        .await?
        .data
        .unwrap();
    assert!(
        seller_orders
            .items
            .iter()
            .all(|o| o.seller_id == seller_a.user_id)
    );
    assert_eq!(seller_orders.items.len(), 1);

    let shipped_only = order_service::list_orders(
        &state,
        &customer,
        OrderListQuery {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(shipped_only.items.len(), 1);
    assert_eq!(shipped_only.items[0].id, order_a.order.id);

    // Dal dropped to 3 units and shows up as low stock for its seller only.
    let low = product_service::list_low_stock(
        &state,
        &seller_a,
        LowStockQuery {
            threshold: Some(5),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert!(low.items.iter().any(|p| p.id == dal.id));
    assert!(low.items.iter().all(|p| p.seller_id == seller_a.user_id));

    Ok(())
}

#[tokio::test]
async fn cart_edits_and_empty_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;
    let category = create_category(&state, &admin).await?;
    let paneer = create_product(&state, &seller, category, "Paneer", 9_000, 3).await?;
    let curd = create_product(&state, &seller, category, "Curd", 4_000, 10).await?;

    let too_many = add(&state, &customer, paneer.id, 4).await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));

    add(&state, &customer, paneer.id, 2).await?;
    add(&state, &customer, curd.id, 1).await?;

    let over = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: paneer.id,
            quantity: 2,
        },
    )
    .await;
    assert!(matches!(over, Err(AppError::BadRequest(_))));

    let removed = cart_service::set_quantity(
        &state,
        &customer,
        curd.id,
        UpdateCartQuantityRequest { quantity: 0 },
    )
    .await?;
    assert!(removed.data.unwrap().is_none());

    cart_service::remove_from_cart(&state, &customer, paneer.id).await?;
    let missing = cart_service::remove_from_cart(&state, &customer, paneer.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, 0);

    let area = area_service::create_area(
        &state,
        &customer,
        CreateAreaRequest {
            area_name: "Kothrud".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411038".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let empty = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            area_id: area.id,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(empty, Err(AppError::BadRequest(msg)) if msg == "Cart is empty"));

    // Someone else's area is invisible.
    let stranger = register(&state, Role::Customer).await?;
    let foreign = area_service::delete_area(&state, &stranger, area.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn concurrent_adds_of_one_product_sum_up() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;
    let category = create_category(&state, &admin).await?;
    let atta = create_product(&state, &seller, category, "Atta", 4_500, 50).await?;

    let (first, second, third) = tokio::join!(
        add(&state, &customer, atta.id, 2),
        add(&state, &customer, atta.id, 3),
        add(&state, &customer, atta.id, 4),
    );
    first?;
    second?;
    third?;

    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 9);
    assert_eq!(cart.total, 9 * 4_500);

    // An increment that would pass stock is rolled back whole.
    let over = add(&state, &customer, atta.id, 42).await;
    assert!(matches!(over, Err(AppError::BadRequest(_))));
    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.items[0].quantity, 9);

    Ok(())
}

#[tokio::test]
async fn registration_and_login() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let email = format!("{}@example.com", unique("login"));
    let request = || RegisterRequest {
        email: email.clone(),
        password: "secret123".into(),
        first_name: "Meera".into(),
        last_name: "Kulkarni".into(),
        phone: "9123456789".into(),
        role: Role::Customer,
        address: None,
        shop_name: None,
        shop_address: None,
    };
    auth_service::register_user(&state, request()).await?;

    let duplicate = auth_service::register_user(&state, request()).await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(msg)) if msg == "Email is already taken"));

    let wrong_password = auth_service::login_user(
        &state,
        LoginRequest {
            email: email.clone(),
            password: "not-it".into(),
        },
    )
    .await;
    assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));

    let unknown = auth_service::login_user(
        &state,
        LoginRequest {
            email: format!("{}@example.com", unique("nobody")),
            password: "secret123".into(),
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::Unauthorized(_))));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: email.to_uppercase(),
            password: "secret123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(login.token.starts_with("Bearer "));
    assert_eq!(login.user.email, email);
    assert_eq!(login.user.role, Role::Customer);

    Ok(())
}

#[tokio::test]
async fn catalog_deletes_and_name_rules() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;
    let category = create_category(&state, &admin).await?;
    let jaggery = create_product(&state, &seller, category, "Jaggery", 6_000, 8).await?;
    let ghee = create_product(&state, &seller, category, "Ghee", 55_000, 4).await?;

    // A product only sitting in carts can go; the cart line goes with it.
    add(&state, &customer, jaggery.id, 2).await?;
    let stranger = register(&state, Role::Seller).await?;
    let foreign = product_service::delete_product(&state, &stranger, jaggery.id).await;
    assert!(matches!(foreign, Err(AppError::Forbidden)));
    product_service::delete_product(&state, &seller, jaggery.id).await?;
    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert!(cart.items.is_empty());
    let gone = product_service::get_product(&state, jaggery.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    // An ordered product stays for order history.
    add(&state, &customer, ghee.id, 1).await?;
    checkout(&state, &customer).await?;
    let ordered = product_service::delete_product(&state, &seller, ghee.id).await;
    assert!(matches!(ordered, Err(AppError::BadRequest(_))));
    assert_eq!(stock_of(&state, ghee.id).await?, 3);

    let in_use = category_service::delete_category(&state, &admin, category).await;
    assert!(matches!(in_use, Err(AppError::BadRequest(_))));

    // Names compare case-insensitively but `_` and `%` are plain characters.
    let base = unique("spice");
    category_service::create_category(&state, &admin, category_request(&format!("{base}x"))).await?;
    let wildcard =
        category_service::create_category(&state, &admin, category_request(&format!("{base}_")))
            .await?
            .data
            .unwrap();
    assert_eq!(wildcard.name, format!("{base}_"));
    let shouted = category_service::create_category(
        &state,
        &admin,
        category_request(&format!("{base}X").to_uppercase()),
    )
    .await;
    assert!(matches!(shouted, Err(AppError::BadRequest(_))));

    let found = category_service::list_categories(
        &state,
        CategoryQuery {
            q: Some(format!("{base}_")),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, wildcard.id);

    let far_page = product_service::list_products(
        &state,
        ProductQuery {
            page: Some(i64::MAX),
            per_page: Some(100),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert!(far_page.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn stock_adjustments_gate_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;
    let category = create_category(&state, &admin).await?;
    let honey = create_product(&state, &seller, category, "Honey", 32_000, 5).await?;

    let zero = product_service::adjust_stock(&state, &seller, honey.id, StockAdjustRequest { delta: 0 }).await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));
    let negative =
        product_service::adjust_stock(&state, &seller, honey.id, StockAdjustRequest { delta: -6 }).await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));
    assert_eq!(stock_of(&state, honey.id).await?, 5);

    add(&state, &customer, honey.id, 4).await?;
    let restock = product_service::adjust_stock(&state, &seller, honey.id, StockAdjustRequest { delta: -3 })
        .await?
        .data
        .unwrap();
    assert_eq!(restock.stock, 2);

    let short = checkout(&state, &customer).await;
    assert!(
        matches!(short, Err(AppError::BadRequest(msg)) if msg == "Insufficient stock for product Honey")
    );
    assert_eq!(stock_of(&state, honey.id).await?, 2);
    let cart = cart_service::view_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn order_states_are_checked_in_storage() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let customer = register(&state, Role::Customer).await?;
    let category = create_category(&state, &admin).await?;
    let oil = create_product(&state, &seller, category, "Groundnut Oil", 21_000, 3).await?;
    add(&state, &customer, oil.id, 1).await?;
    let order_id = checkout(&state, &customer).await?.orders[0].order.id;

    let bad_status = sqlx::query("UPDATE orders SET status = 'lost' WHERE id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await;
    assert!(bad_status.is_err());
    let bad_payment = sqlx::query("UPDATE orders SET payment_status = 'void' WHERE id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await;
    assert!(bad_payment.is_err());

    let order = order_service::get_order(&state, &customer, order_id)
        .await?
        .data
        .unwrap();
    assert_eq!(order.order.status, OrderStatus::Pending);
    assert_eq!(order.order.payment_status, PaymentStatus::Unpaid);

    Ok(())
}

#[tokio::test]
async fn product_images_keep_a_single_primary() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_admin(&state).await?;
    let seller = register(&state, Role::Seller).await?;
    let category = create_category(&state, &admin).await?;
    let mango = create_product(&state, &seller, category, "Alphonso Mango", 80_000, 12).await?;

    let front = product_image_service::add_image(&state, &seller, mango.id, image("front", false, 1))
        .await?
        .data
        .unwrap();
    assert!(front.is_primary);
    let side = product_image_service::add_image(&state, &seller, mango.id, image("side", false, 0))
        .await?
        .data
        .unwrap();
    assert!(!side.is_primary);
    let crate_shot = product_image_service::add_image(&state, &seller, mango.id, image("crate", true, 2))
        .await?
        .data
        .unwrap();
    assert!(crate_shot.is_primary);

    let images = product_image_service::list_images(&state, mango.id).await?.data.unwrap();
    let order: Vec<Uuid> = images.items.iter().map(|i| i.id).collect();
    assert_eq!(order, [crate_shot.id, side.id, front.id]);
    assert_eq!(images.items.iter().filter(|i| i.is_primary).count(), 1);
    let cover = product_service::get_product(&state, mango.id).await?.data.unwrap();
    assert_eq!(cover.image_url.as_deref(), Some(crate_shot.image_url.as_str()));

    let other = register(&state, Role::Seller).await?;
    let foreign = product_image_service::add_image(&state, &other, mango.id, image("x", false, 0)).await;
    assert!(matches!(foreign, Err(AppError::Forbidden)));

    product_image_service::set_primary(&state, &seller, mango.id, front.id).await?;
    product_image_service::delete_image(&state, &seller, mango.id, front.id).await?;
    let images = product_image_service::list_images(&state, mango.id).await?.data.unwrap();
    assert_eq!(images.items.len(), 2);
    assert!(images.items[0].is_primary);
    assert_eq!(images.items[0].id, side.id);

    let missing = product_image_service::delete_image(&state, &seller, mango.id, front.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    product_service::delete_product(&state, &seller, mango.id).await?;
    let orphaned = product_image_service::list_images(&state, mango.id).await;
    assert!(matches!(orphaned, Err(AppError::NotFound)));

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let state = AppState::new(pool, AppConfig::for_database(database_url, "test-secret"));
    run_migrations(&state.orm).await?;
    Ok(Some(state))
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..12])
}

async fn create_admin(state: &AppState) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", unique("admin"))),
        password_hash: Set(auth_service::hash_password("admin123")?),
        role: Set(Role::Admin.as_str().into()),
        first_name: Set("Test".into()),
        last_name: Set("Admin".into()),
        phone: Set("9000000000".into()),
        address: Set(None),
        shop_name: Set(None),
        shop_address: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: Role::Admin,
    })
}

async fn register(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let is_seller = role == Role::Seller;
    let user = auth_service::register_user(
        state,
        RegisterRequest {
            email: format!("{}@example.com", unique(role.as_str())),
            password: "secret123".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: "9876543210".into(),
            role,
            address: None,
            shop_name: is_seller.then(|| "Corner Shop".to_string()),
            shop_address: is_seller.then(|| "1 Main Street".to_string()),
        },
    )
    .await?
    .data
    .unwrap();

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

async fn create_category(state: &AppState, admin: &AuthUser) -> anyhow::Result<Uuid> {
    let category = category_service::create_category(
        state,
        admin,
        CreateCategoryRequest {
            name: unique("cat"),
            description: None,
            active: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(category.id)
}

async fn create_product(
    state: &AppState,
    seller: &AuthUser,
    category_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Product> {
    let product = product_service::create_product(
        state,
        seller,
        CreateProductRequest {
            name: name.into(),
            description: None,
            category_id,
            price,
            unit: "kg".into(),
            stock,
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(product)
}

async fn add(
    state: &AppState,
    customer: &AuthUser,
    product_id: Uuid,
    quantity: i32,
) -> Result<(), AppError> {
    cart_service::add_to_cart(
        state,
        customer,
        AddToCartRequest {
            product_id,
            quantity,
        },
    )
    .await?;
    Ok(())
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let product = product_service::get_product(state, id).await?.data.unwrap();
    Ok(product.stock)
}

fn category_request(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.into(),
        description: None,
        active: None,
    }
}

fn image(name: &str, is_primary: bool, sort_order: i32) -> CreateProductImageRequest {
    CreateProductImageRequest {
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        alt_text: Some(name.into()),
        is_primary,
        sort_order,
    }
}

async fn checkout(state: &AppState, customer: &AuthUser) -> Result<CheckoutResult, AppError> {
    let area = area_service::create_area(
        state,
        customer,
        CreateAreaRequest {
            area_name: "Aundh".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411007".into(),
        },
    )
    .await?
    .data
    .ok_or(AppError::NotFound)?;

    let result = order_service::checkout(
        state,
        customer,
        CheckoutRequest {
            area_id: area.id,
            payment_method: None,
        },
    )
    .await?
    .data
    .ok_or(AppError::NotFound)?;
    Ok(result)
}
