//! Navigator port - side-effecting route changes.

use async_trait::async_trait;

use crate::domain::foundation::Route;

/// Port for moving the user between views. The engine fires navigation
/// strictly after the corresponding store transition has settled.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn go_to(&self, route: Route);
}
