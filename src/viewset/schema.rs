use crate::route::ResponseModel;
use std::collections::BTreeMap;

/// Models used by one action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSchema {
    pub response: Option<ResponseModel>,
    pub payload: Option<ResponseModel>,
}

impl ActionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response(mut self, model: ResponseModel) -> Self {
        self.response = Some(model);
        self
    }

    pub fn payload(mut self, model: ResponseModel) -> Self {
        self.payload = Some(model);
        self
    }
}

/// Action name to [`ActionSchema`], e.g. `{"list": {response: Todo}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaConfig {
    actions: BTreeMap<String, ActionSchema>,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, name: impl Into<String>, schema: ActionSchema) -> Self {
        self.actions.insert(name.into(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ActionSchema> {
        self.actions.get(name)
    }

    pub fn response(&self, name: &str) -> Option<&ResponseModel> {
        self.get(name).and_then(|s| s.response.as_ref())
    }

    pub fn payload(&self, name: &str) -> Option<&ResponseModel> {
        self.get(name).and_then(|s| s.payload.as_ref())
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_action() {
        let config = SchemaConfig::new()
            .action(
                "create",
                ActionSchema::new()
                    .payload(ResponseModel::named("NewTodo"))
                    .response(ResponseModel::named("Todo")),
            )
            .action("list", ActionSchema::new().response(ResponseModel::named("Todo").many()));

        assert_eq!(config.payload("create").map(|m| m.name()), Some("NewTodo"));
        assert!(config.response("list").is_some_and(|m| m.is_many()));
        assert!(config.payload("list").is_none());
        assert!(config.get("delete").is_none());
        assert_eq!(config.actions().collect::<Vec<_>>(), vec!["create", "list"]);
    }
}
