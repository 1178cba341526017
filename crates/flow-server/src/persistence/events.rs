//! Event persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use flow_core::models::Event;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: String,
    name: String,
    date_start: String,
    date_end: String,
    flight_information_region_id: String,
}

impl TryFrom<EventRow> for Event {
    type Error = anyhow::Error;

    fn try_from(row: EventRow) -> Result<Self> {
        Ok(Event {
            id: row.id,
            name: row.name,
            date_start: parse_utc(&row.date_start)?,
            date_end: parse_utc(&row.date_end)?,
            flight_information_region_id: row.flight_information_region_id,
        })
    }
}

pub(crate) fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

pub async fn insert_event(pool: &SqlitePool, event: &Event) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO events (id, name, date_start, date_end, flight_information_region_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&event.id)
    .bind(&event.name)
    .bind(event.date_start.to_rfc3339())
    .bind(event.date_end.to_rfc3339())
    .bind(&event.flight_information_region_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_event(pool: &SqlitePool, id: &str) -> Result<Option<Event>> {
    let row = sqlx::query_as::<_, EventRow>(
        "SELECT id, name, date_start, date_end, flight_information_region_id FROM events WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(row.try_into()?)),
        None => Ok(None),
    }
}

pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>> {
    let rows = sqlx::query_as::<_, EventRow>(
        "SELECT id, name, date_start, date_end, flight_information_region_id FROM events ORDER BY date_start",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|row| row.try_into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{firs, init_database};
    use chrono::TimeZone;
    use flow_core::models::FlightInformationRegion;

    #[tokio::test]
    async fn insert_and_load_event() {
        let db = init_database(":memory:", 1).await.unwrap();
        firs::insert_fir(
            db.pool(),
            &FlightInformationRegion {
                id: "fir-1".to_string(),
                identifier: "EGTT".to_string(),
                name: "London".to_string(),
            },
        )
        .await
        .unwrap();

        let event = Event {
            id: "event-1".to_string(),
            name: "Cross the Pond".to_string(),
            date_start: Utc.with_ymd_and_hms(2022, 5, 22, 12, 0, 0).unwrap(),
            date_end: Utc.with_ymd_and_hms(2022, 5, 22, 18, 0, 0).unwrap(),
            flight_information_region_id: "fir-1".to_string(),
        };
        insert_event(db.pool(), &event).await.unwrap();

        let loaded = load_event(db.pool(), "event-1").await.unwrap().unwrap();
        assert_eq!(loaded, event);
        assert_eq!(list_events(db.pool()).await.unwrap().len(), 1);
    }
}
