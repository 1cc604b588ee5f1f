use async_trait::async_trait;
use uuid::Uuid;

/// Trait for generating player ids
pub trait PlayerIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// UUID v4 player id generator
pub struct UuidPlayerIdGenerator;

impl PlayerIdGenerator for UuidPlayerIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Trait for generating display names
#[async_trait]
pub trait DisplayNameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based display name generator
pub struct PetNameGenerator;

impl PetNameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DisplayNameGenerator for PetNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}
