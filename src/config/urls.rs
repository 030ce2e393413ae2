//! URL configuration

use multiform_http::Router;
use std::sync::Arc;

use super::state::AppState;
use crate::apps::users::views::IndexView;

pub fn url_patterns(state: Arc<AppState>) -> Router {
	Router::new().route("/", Arc::new(IndexView::new(state)))
}
