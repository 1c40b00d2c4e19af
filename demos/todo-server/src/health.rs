use rest_utils::prelude::*;
use serde_json::{Value, json};

#[derive(Default)]
pub struct HealthViewSet;

impl ViewSet for HealthViewSet {
    fn routes_config(&self) -> Vec<RouteConfig> {
        vec![
            RouteConfig::get("/", "status")
                .summary("Liveness probe")
                .response_model(ResponseModel::named("Health")),
            RouteConfig::get("/echo/{word}", "echo").include_in_schema(false),
        ]
    }
}

#[viewset]
impl HealthViewSet {
    #[action]
    async fn status(&self) -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }

    #[action]
    async fn echo(&self, Path(word): Path<String>) -> String {
        word
    }
}
