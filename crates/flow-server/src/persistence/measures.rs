//! Flow measure persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use flow_core::enums::{FlowMeasureStatus, FlowMeasureType};
use flow_core::models::{FlowFilter, FlowMeasure, FlowMeasureUpdate, NotifiedRegion};
use sqlx::SqlitePool;

use super::events::parse_utc;
use super::{events, firs};

pub(crate) fn status_to_str(status: FlowMeasureStatus) -> &'static str {
    match status {
        FlowMeasureStatus::Notified => "notified",
        FlowMeasureStatus::Active => "active",
        FlowMeasureStatus::Withdrawn => "withdrawn",
        FlowMeasureStatus::Expired => "expired",
    }
}

pub(crate) fn str_to_status(raw: &str) -> Result<FlowMeasureStatus> {
    match raw {
        "notified" => Ok(FlowMeasureStatus::Notified),
        "active" => Ok(FlowMeasureStatus::Active),
        "withdrawn" => Ok(FlowMeasureStatus::Withdrawn),
        "expired" => Ok(FlowMeasureStatus::Expired),
        other => anyhow::bail!("Unknown flow measure status: {}", other),
    }
}

fn type_to_str(measure_type: FlowMeasureType) -> &'static str {
    match measure_type {
        FlowMeasureType::MinimumDepartureInterval => "minimum_departure_interval",
        FlowMeasureType::AverageDepartureInterval => "average_departure_interval",
        FlowMeasureType::PerHourRate => "per_hour_rate",
        FlowMeasureType::MilesInTrail => "miles_in_trail",
        FlowMeasureType::MaxIndicatedAirspeed => "max_indicated_airspeed",
        FlowMeasureType::IndicatedAirspeedReduction => "indicated_airspeed_reduction",
        FlowMeasureType::Prohibit => "prohibit",
        FlowMeasureType::MandatoryRoute => "mandatory_route",
        FlowMeasureType::LevelCap => "level_cap",
    }
}

fn str_to_type(raw: &str) -> Result<FlowMeasureType> {
    match raw {
        "minimum_departure_interval" => Ok(FlowMeasureType::MinimumDepartureInterval),
        "average_departure_interval" => Ok(FlowMeasureType::AverageDepartureInterval),
        "per_hour_rate" => Ok(FlowMeasureType::PerHourRate),
        "miles_in_trail" => Ok(FlowMeasureType::MilesInTrail),
        "max_indicated_airspeed" => Ok(FlowMeasureType::MaxIndicatedAirspeed),
        "indicated_airspeed_reduction" => Ok(FlowMeasureType::IndicatedAirspeedReduction),
        "prohibit" => Ok(FlowMeasureType::Prohibit),
        "mandatory_route" => Ok(FlowMeasureType::MandatoryRoute),
        "level_cap" => Ok(FlowMeasureType::LevelCap),
        other => anyhow::bail!("Unknown flow measure type: {}", other),
    }
}

#[derive(sqlx::FromRow)]
struct MeasureRow {
    id: String,
    identifier: String,
    measure_type: String,
    status: String,
    reason: String,
    start_time: String,
    end_time: String,
    value: Option<String>,
    minutes: i64,
    seconds: i64,
    mandatory_route: String,
    additional_filters: String,
    flight_information_region_id: String,
    event_id: Option<String>,
    user_id: String,
}

const MEASURE_COLUMNS: &str = "id, identifier, measure_type, status, reason, start_time, end_time, \
    value, minutes, seconds, mandatory_route, additional_filters, \
    flight_information_region_id, event_id, user_id";

/// Insert a measure together with its notified region set in one
/// transaction, so a failure leaves no partial write behind.
pub async fn insert_measure(pool: &SqlitePool, measure: &FlowMeasure) -> Result<()> {
    let mandatory_route = serde_json::to_string(&measure.mandatory_route)?;
    let additional_filters = serde_json::to_string(&measure.additional_filters)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO flow_measures (
            id, identifier, measure_type, status, reason,
            start_time, end_time, value, minutes, seconds,
            mandatory_route, additional_filters,
            flight_information_region_id, event_id, user_id
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
    )
    .bind(&measure.id)
    .bind(&measure.identifier)
    .bind(type_to_str(measure.measure_type))
    .bind(status_to_str(measure.status))
    .bind(&measure.reason)
    .bind(measure.start_time.to_rfc3339())
    .bind(measure.end_time.to_rfc3339())
    .bind(&measure.value)
    .bind(measure.minutes as i64)
    .bind(measure.seconds as i64)
    .bind(&mandatory_route)
    .bind(&additional_filters)
    .bind(&measure.flight_information_region_id)
    .bind(measure.event.as_ref().map(|e| e.id.clone()))
    .bind(&measure.user_id)
    .execute(&mut *tx)
    .await?;

    for notified in &measure.notified_regions {
        sqlx::query(
            "INSERT INTO flow_measure_notified_firs (flow_measure_id, flight_information_region_id) VALUES (?1, ?2)",
        )
        .bind(&measure.id)
        .bind(&notified.region.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Load a measure with its event and notified regions resolved.
pub async fn load_measure(pool: &SqlitePool, id: &str) -> Result<Option<FlowMeasure>> {
    let row = sqlx::query_as::<_, MeasureRow>(&format!(
        "SELECT {} FROM flow_measures WHERE id = ?1",
        MEASURE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(resolve(pool, row).await?)),
        None => Ok(None),
    }
}

/// List measures, optionally filtered by status, ordered by start time.
pub async fn list_measures(
    pool: &SqlitePool,
    status: Option<FlowMeasureStatus>,
) -> Result<Vec<FlowMeasure>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, MeasureRow>(&format!(
                "SELECT {} FROM flow_measures WHERE status = ?1 ORDER BY start_time",
                MEASURE_COLUMNS
            ))
            .bind(status_to_str(status))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, MeasureRow>(&format!(
                "SELECT {} FROM flow_measures ORDER BY start_time",
                MEASURE_COLUMNS
            ))
            .fetch_all(pool)
            .await?
        }
    };

    let mut measures = Vec::with_capacity(rows.len());
    for row in rows {
        measures.push(resolve(pool, row).await?);
    }
    Ok(measures)
}

/// Measures that may still transition: notified or active.
pub async fn list_unconcluded(pool: &SqlitePool) -> Result<Vec<FlowMeasure>> {
    let rows = sqlx::query_as::<_, MeasureRow>(&format!(
        "SELECT {} FROM flow_measures WHERE status IN ('notified', 'active') ORDER BY start_time",
        MEASURE_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    let mut measures = Vec::with_capacity(rows.len());
    for row in rows {
        measures.push(resolve(pool, row).await?);
    }
    Ok(measures)
}

pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: FlowMeasureStatus,
) -> Result<()> {
    sqlx::query("UPDATE flow_measures SET status = ?2 WHERE id = ?1")
        .bind(id)
        .bind(status_to_str(status))
        .execute(pool)
        .await?;

    Ok(())
}

/// Apply the editable fields and replace the notified region set in one
/// transaction. Old associations not in the new set are removed (set-sync
/// semantics), never patched incrementally.
pub async fn update_editable(
    pool: &SqlitePool,
    id: &str,
    update: &FlowMeasureUpdate,
) -> Result<()> {
    let mandatory_route = serde_json::to_string(&update.mandatory_route)?;
    let additional_filters = serde_json::to_string(&update.additional_filters)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE flow_measures SET
            reason = ?2, end_time = ?3, value = ?4,
            minutes = ?5, seconds = ?6,
            mandatory_route = ?7, additional_filters = ?8
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(&update.reason)
    .bind(update.end_time.to_rfc3339())
    .bind(&update.value)
    .bind(update.minutes as i64)
    .bind(update.seconds as i64)
    .bind(&mandatory_route)
    .bind(&additional_filters)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM flow_measure_notified_firs WHERE flow_measure_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for fir_id in &update.notified_flight_information_region_ids {
        sqlx::query(
            "INSERT INTO flow_measure_notified_firs (flow_measure_id, flight_information_region_id) VALUES (?1, ?2)",
        )
        .bind(id)
        .bind(fir_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Number of measures created for a region on the given UTC day. Drives
/// the 2-digit identifier sequence.
pub async fn count_for_fir_on_day(
    pool: &SqlitePool,
    fir_id: &str,
    day: DateTime<Utc>,
) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM flow_measures WHERE flight_information_region_id = ?1 AND date(created_at) = date(?2)",
    )
    .bind(fir_id)
    .bind(day.to_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(count)
}

async fn resolve(pool: &SqlitePool, row: MeasureRow) -> Result<FlowMeasure> {
    let event = match &row.event_id {
        Some(event_id) => events::load_event(pool, event_id).await?,
        None => None,
    };

    let notified_fir_ids: Vec<(String,)> = sqlx::query_as(
        "SELECT flight_information_region_id FROM flow_measure_notified_firs WHERE flow_measure_id = ?1",
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let mut notified_regions = Vec::with_capacity(notified_fir_ids.len());
    for (fir_id,) in notified_fir_ids {
        let Some(region) = firs::load_fir(pool, &fir_id).await? else {
            continue;
        };
        let discord_tags = firs::load_tags_for_fir(pool, &fir_id).await?;
        notified_regions.push(NotifiedRegion {
            region,
            discord_tags,
        });
    }

    let mandatory_route: Vec<String> = serde_json::from_str(&row.mandatory_route)?;
    let additional_filters: Vec<FlowFilter> = serde_json::from_str(&row.additional_filters)?;

    Ok(FlowMeasure {
        id: row.id,
        identifier: row.identifier,
        measure_type: str_to_type(&row.measure_type)?,
        status: str_to_status(&row.status)?,
        reason: row.reason,
        start_time: parse_utc(&row.start_time)?,
        end_time: parse_utc(&row.end_time)?,
        value: row.value,
        minutes: row.minutes as u32,
        seconds: row.seconds as u32,
        mandatory_route,
        additional_filters,
        flight_information_region_id: row.flight_information_region_id,
        event,
        user_id: row.user_id,
        notified_regions,
    })
}
