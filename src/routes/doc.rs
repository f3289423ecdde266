use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{admin, areas, auth as auth_dto, cart as cart_dto, categories as category_dto, orders as order_dto, products},
    models::{
        Area, CartItem, Category, Order, OrderItem, OrderStatus, PaymentStatus, Product,
        ProductImage, Role, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin as admin_routes, areas as area_routes, auth, cart, categories, health, orders, params,
        products as product_routes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::update_me,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::adjust_stock,
        product_routes::list_low_stock,
        product_routes::list_images,
        product_routes::add_image,
        product_routes::set_primary_image,
        product_routes::delete_image,
        cart::cart_list,
        cart::add_to_cart,
        cart::set_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::validate_cart,
        area_routes::list_areas,
        area_routes::create_area,
        area_routes::delete_area,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::pay_order,
        orders::cancel_order,
        orders::update_order_status,
        admin_routes::list_users,
        admin_routes::summary,
        admin_routes::list_audit_logs
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            PaymentStatus,
            User,
            Category,
            Product,
            ProductImage,
            CartItem,
            Area,
            Order,
            OrderItem,
            auth_dto::RegisterRequest,
            auth_dto::LoginRequest,
            auth_dto::LoginResponse,
            auth_dto::UpdateProfileRequest,
            category_dto::CreateCategoryRequest,
            category_dto::UpdateCategoryRequest,
            category_dto::CategoryList,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            products::StockAdjustRequest,
            products::ProductList,
            products::CreateProductImageRequest,
            products::ProductImageList,
            cart_dto::AddToCartRequest,
            cart_dto::UpdateCartQuantityRequest,
            cart_dto::CartLine,
            cart_dto::CartView,
            cart_dto::StockIssue,
            cart_dto::CartValidation,
            areas::CreateAreaRequest,
            areas::AreaList,
            order_dto::CheckoutRequest,
            order_dto::PayOrderRequest,
            order_dto::UpdateOrderStatusRequest,
            order_dto::OrderWithItems,
            order_dto::CheckoutResult,
            order_dto::OrderList,
            admin::UserList,
            admin::StoreSummary,
            admin::AuditEntry,
            admin::AuditList,
            params::Pagination,
            params::SortOrder,
            params::ProductSortBy,
            Meta,
            ApiResponse<User>,
            ApiResponse<Product>,
            ApiResponse<products::ProductList>,
            ApiResponse<products::ProductImageList>,
            ApiResponse<order_dto::OrderWithItems>,
            ApiResponse<order_dto::OrderList>,
            ApiResponse<cart_dto::CartView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product and inventory endpoints"),
        (name = "Cart", description = "Customer cart endpoints"),
        (name = "Areas", description = "Delivery area endpoints"),
        (name = "Orders", description = "Checkout and order lifecycle endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_routes_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/products/{id}/images"));
        assert!(doc.paths.paths.contains_key("/api/products/{id}/images/{image_id}/primary"));
    }
}
