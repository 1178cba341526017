//! Flight information region and Discord tag persistence.

use anyhow::Result;
use flow_core::models::{DiscordTag, FlightInformationRegion};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct FirRow {
    id: String,
    identifier: String,
    name: String,
}

impl From<FirRow> for FlightInformationRegion {
    fn from(row: FirRow) -> Self {
        Self {
            id: row.id,
            identifier: row.identifier,
            name: row.name,
        }
    }
}

pub async fn insert_fir(pool: &SqlitePool, fir: &FlightInformationRegion) -> Result<()> {
    sqlx::query(
        "INSERT INTO flight_information_regions (id, identifier, name) VALUES (?1, ?2, ?3)",
    )
    .bind(&fir.id)
    .bind(&fir.identifier)
    .bind(&fir.name)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_fir(pool: &SqlitePool, id: &str) -> Result<Option<FlightInformationRegion>> {
    let row = sqlx::query_as::<_, FirRow>(
        "SELECT id, identifier, name FROM flight_information_regions WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(FlightInformationRegion::from))
}

pub async fn find_by_identifier(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<FlightInformationRegion>> {
    let row = sqlx::query_as::<_, FirRow>(
        "SELECT id, identifier, name FROM flight_information_regions WHERE identifier = ?1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(FlightInformationRegion::from))
}

pub async fn list_firs(pool: &SqlitePool) -> Result<Vec<FlightInformationRegion>> {
    let rows = sqlx::query_as::<_, FirRow>(
        "SELECT id, identifier, name FROM flight_information_regions ORDER BY identifier",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FlightInformationRegion::from).collect())
}

#[derive(sqlx::FromRow)]
struct DiscordTagRow {
    id: String,
    flight_information_region_id: String,
    tag: String,
}

impl From<DiscordTagRow> for DiscordTag {
    fn from(row: DiscordTagRow) -> Self {
        Self {
            id: row.id,
            flight_information_region_id: row.flight_information_region_id,
            tag: row.tag,
        }
    }
}

pub async fn insert_discord_tag(pool: &SqlitePool, tag: &DiscordTag) -> Result<()> {
    sqlx::query("INSERT INTO discord_tags (id, flight_information_region_id, tag) VALUES (?1, ?2, ?3)")
        .bind(&tag.id)
        .bind(&tag.flight_information_region_id)
        .bind(&tag.tag)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn load_tags_for_fir(pool: &SqlitePool, fir_id: &str) -> Result<Vec<DiscordTag>> {
    let rows = sqlx::query_as::<_, DiscordTagRow>(
        "SELECT id, flight_information_region_id, tag FROM discord_tags WHERE flight_information_region_id = ?1 ORDER BY created_at",
    )
    .bind(fir_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(DiscordTag::from).collect())
}
