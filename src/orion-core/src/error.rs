/// Errors raised by the data model itself, before anything touches the network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("attribute '{name}' not found on entity '{entity_id}'")]
    AttributeNotFound { entity_id: String, name: String },
}
