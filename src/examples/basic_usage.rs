//! Basic Knowledge Processor Example
//!
//! Creates a couple of rooms on an Orion broker, updates one attribute and
//! queries them back.
//!
//! Run with: cargo run -p orion-rs --example basic_usage [config.json]

use orion_rs::{Attribute, ClientConfig, ClientError, Entity, KnowledgeProcessor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orion_rs=debug")),
        )
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(&path)?,
        None => ClientConfig::default().with_debug(true),
    };
    tracing::info!("Using broker at {}", config.base_url());

    let kp = KnowledgeProcessor::new(config)?;

    // Build two rooms
    let mut room1 = Entity::new("Room1", "Room");
    room1.add_attributes([
        Attribute::new("temperature", "float", "23"),
        Attribute::new("pressure", "integer", "720"),
    ]);
    let room2 = Entity::new("Room2", "Room")
        .with_attributes([Attribute::new("temperature", "float", "21")]);

    match kp.create_entities(&[room1.clone(), room2]).await {
        Ok(responses) => println!("✅ Created {} entities", responses.context_responses.len()),
        Err(ClientError::PartialFailure { total, failures }) => {
            println!("⚠️  {} of {} entities rejected", failures.len(), total);
            for failure in failures {
                println!("   {}: {}", failure.code, failure.reason_phrase);
            }
        }
        Err(e) => return Err(e.into()),
    }

    // Update one attribute
    kp.update_attribute("Room1", &Attribute::new("temperature", "float", "26.5"))
        .await?;
    println!("📝 Updated Room1 temperature");

    // Query by id (raw body) and by pattern (parsed)
    let raw = kp.query_by_entity_id("Room1").await?;
    println!("🔍 Room1: {}", raw.body);

    let rooms = kp.query_entities(&[Entity::pattern("Room.*", "Room")]).await?;
    for room in &rooms {
        println!("   {} ({} attributes)", room.id, room.attribute_count());
    }

    // Local attribute bookkeeping
    room1.del_attributes(&[Attribute::new("pressure", "integer", "720")])?;
    println!("   Room1 now carries {} attribute(s) locally", room1.attribute_count());

    kp.delete_entity("Room2").await?;
    println!("🗑️  Deleted Room2");

    Ok(())
}
