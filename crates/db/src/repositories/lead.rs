use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use interiq_core::domain::lead::{Lead, LeadId};
use interiq_core::estimate::{OrderedBreakdown, PackageTier};
use interiq_core::scoring::LeadCategory;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use super::{LeadPage, LeadQuery, LeadRepository, RepositoryError};
use crate::DbPool;

const LEAD_COLUMNS: &str = "id, name, phone, email, property_type, carpet_area, city, budget, \
     timeline, rooms_json, style, possession_status, package_type, cost_per_sq_ft, \
     estimated_cost, cost_breakdown_json, lead_score, lead_category, ai_recommendation, created_at";

pub struct SqlLeadRepository {
    pool: DbPool,
}

impl SqlLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LeadRepository for SqlLeadRepository {
    async fn save(&self, lead: Lead) -> Result<(), RepositoryError> {
        let rooms_json = serde_json::to_string(&lead.rooms)
            .map_err(|error| RepositoryError::Decode(format!("rooms: {error}")))?;
        let breakdown_json = serde_json::to_string(&lead.cost_breakdown)
            .map_err(|error| RepositoryError::Decode(format!("cost_breakdown: {error}")))?;

        sqlx::query(
            r#"
            INSERT INTO leads (
                id, name, phone, email, property_type, carpet_area, city, budget,
                timeline, rooms_json, style, possession_status, package_type, cost_per_sq_ft,
                estimated_cost, cost_breakdown_json, lead_score, lead_category,
                ai_recommendation, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                phone = excluded.phone,
                email = excluded.email,
                property_type = excluded.property_type,
                carpet_area = excluded.carpet_area,
                city = excluded.city,
                budget = excluded.budget,
                timeline = excluded.timeline,
                rooms_json = excluded.rooms_json,
                style = excluded.style,
                possession_status = excluded.possession_status,
                package_type = excluded.package_type,
                cost_per_sq_ft = excluded.cost_per_sq_ft,
                estimated_cost = excluded.estimated_cost,
                cost_breakdown_json = excluded.cost_breakdown_json,
                lead_score = excluded.lead_score,
                lead_category = excluded.lead_category,
                ai_recommendation = excluded.ai_recommendation
            "#,
        )
        .bind(&lead.id.0)
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(&lead.property_type)
        .bind(lead.carpet_area.to_string())
        .bind(&lead.city)
        .bind(lead.budget.to_string())
        .bind(&lead.timeline)
        .bind(rooms_json)
        .bind(&lead.style)
        .bind(&lead.possession_status)
        .bind(lead.package_type.as_str())
        .bind(lead.cost_per_sq_ft.to_string())
        .bind(lead.estimated_cost.to_string())
        .bind(breakdown_json)
        .bind(i64::from(lead.lead_score))
        .bind(lead.lead_category.as_str())
        .bind(&lead.ai_recommendation)
        .bind(format_timestamp(&lead.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| lead_from_row(&r)).transpose()
    }

    async fn list(&self, query: &LeadQuery) -> Result<LeadPage, RepositoryError> {
        let category = query.category.map(LeadCategory::as_str);

        let total: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM leads WHERE (?1 IS NULL OR lead_category = ?1)",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?
        .try_get("count")?;

        let rows = sqlx::query(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads
             WHERE (?1 IS NULL OR lead_category = ?1)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2 OFFSET ?3"
        ))
        .bind(category)
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let leads = rows.iter().map(lead_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(LeadPage::new(leads, u64::try_from(total).unwrap_or_default(), query))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        crate::connection::ping(&self.pool).await?;
        Ok(())
    }

    fn storage_kind(&self) -> &'static str {
        "sqlite"
    }
}

fn lead_from_row(row: &SqliteRow) -> Result<Lead, RepositoryError> {
    let rooms_json: String = row.try_get("rooms_json")?;
    let breakdown_json: String = row.try_get("cost_breakdown_json")?;
    let package_type: String = row.try_get("package_type")?;
    let lead_category: String = row.try_get("lead_category")?;
    let lead_score: i64 = row.try_get("lead_score")?;
    let created_at: String = row.try_get("created_at")?;

    let rooms: Vec<String> = serde_json::from_str(&rooms_json)
        .map_err(|error| RepositoryError::Decode(format!("invalid rooms_json: {error}")))?;
    let cost_breakdown: OrderedBreakdown<Decimal> = serde_json::from_str(&breakdown_json)
        .map_err(|error| {
            RepositoryError::Decode(format!("invalid cost_breakdown_json: {error}"))
        })?;

    Ok(Lead {
        id: LeadId(row.try_get("id")?),
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        property_type: row.try_get("property_type")?,
        carpet_area: decimal_column(row, "carpet_area")?,
        city: row.try_get("city")?,
        budget: decimal_column(row, "budget")?,
        timeline: row.try_get("timeline")?,
        rooms,
        style: row.try_get("style")?,
        possession_status: row.try_get("possession_status")?,
        package_type: PackageTier::from_str(&package_type).map_err(RepositoryError::Decode)?,
        cost_per_sq_ft: decimal_column(row, "cost_per_sq_ft")?,
        estimated_cost: decimal_column(row, "estimated_cost")?,
        cost_breakdown,
        lead_score: u8::try_from(lead_score).map_err(|_| {
            RepositoryError::Decode(format!("lead_score out of range: {lead_score}"))
        })?,
        lead_category: LeadCategory::from_str(&lead_category).map_err(RepositoryError::Decode)?,
        ai_recommendation: row.try_get("ai_recommendation")?,
        created_at: parse_timestamp("created_at", created_at)?,
    })
}

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw)
        .map_err(|e| RepositoryError::Decode(format!("invalid decimal in `{column}`: {e}")))
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp in `{column}`: {e}")))
}
