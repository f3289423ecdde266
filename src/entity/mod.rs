pub mod areas;
pub mod audit_logs;
pub mod cart_items;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod product_images;
pub mod products;
pub mod users;

pub use areas::Entity as Areas;
pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_images::Entity as ProductImages;
pub use products::Entity as Products;
pub use users::Entity as Users;
