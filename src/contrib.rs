//! ORM adapter
//!
//! Field mapping, order-by translation, payload sanitizers and
//! [`OrmModelView`].
//!
//! ```rust
//! use reinhardt_admin_orm::contrib::{identity, order_by_to_native};
//!
//! assert_eq!(identity("blog.Post", Some("cms")), "cms_post");
//! assert_eq!(
//!     order_by_to_native(&["views desc".to_string()]).unwrap(),
//!     vec!["-views"]
//! );
//! ```

pub use reinhardt_admin_orm_contrib::*;
