use time::OffsetDateTime;
use uuid::Uuid;

use hearth_config::Config;
use hearth_domain::PayFrequency;
use hearth_storage::{db::Db, models, queries};

use crate::{Error, HearthService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesView {
	pub id: Uuid,
	pub user_id: String,
	pub agent_name: String,
	pub user_name: String,
	pub initialized: bool,
	#[serde(default, with = "crate::time_serde::option")]
	pub payday_date: Option<OffsetDateTime>,
	pub payday_frequency: PayFrequency,
	pub salary: i64,
	pub expenses: i64,
	pub location: String,
}

impl From<models::Preferences> for PreferencesView {
	fn from(row: models::Preferences) -> Self {
		Self {
			id: row.id,
			user_id: row.user_id,
			agent_name: row.agent_name,
			user_name: row.user_name,
			initialized: row.initialized,
			payday_date: row.payday_date,
			payday_frequency: PayFrequency::parse(&row.payday_frequency).unwrap_or_default(),
			salary: row.salary,
			expenses: row.expenses,
			location: row.location,
		}
	}
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
	pub agent_name: Option<String>,
	pub user_name: Option<String>,
	pub initialized: Option<bool>,
	#[serde(default, with = "crate::time_serde::option")]
	pub payday_date: Option<OffsetDateTime>,
	pub payday_frequency: Option<PayFrequency>,
	pub salary: Option<i64>,
	pub expenses: Option<i64>,
	pub location: Option<String>,
}

impl HearthService {
	pub async fn get_preferences(&self, user_id: &str) -> Result<PreferencesView> {
		let row = get_or_create(&self.db, &self.cfg, user_id).await?;

		Ok(row.into())
	}

	pub async fn update_preferences(
		&self,
		user_id: &str,
		req: UpdatePreferencesRequest,
	) -> Result<PreferencesView> {
		for (label, value) in [
			("agentName", req.agent_name.as_ref()),
			("userName", req.user_name.as_ref()),
			("location", req.location.as_ref()),
		] {
			if let Some(value) = value
				&& value.trim().is_empty()
			{
				return Err(Error::InvalidRequest {
					message: format!("{label} must not be empty."),
				});
			}
		}
		for (label, value) in [("salary", req.salary), ("expenses", req.expenses)] {
			if let Some(value) = value
				&& value < 0
			{
				return Err(Error::InvalidRequest {
					message: format!("{label} must not be negative."),
				});
			}
		}

		// The row may not exist yet; updating settings is also first contact.
		get_or_create(&self.db, &self.cfg, user_id).await?;

		let mut tx = self.db.pool.begin().await?;
		let Some(mut row) = queries::fetch_preferences_for_update(&mut tx, user_id).await? else {
			return Err(Error::Storage {
				message: "Preferences row vanished during update.".to_string(),
			});
		};

		if let Some(agent_name) = req.agent_name {
			row.agent_name = agent_name;
		}
		if let Some(user_name) = req.user_name {
			row.user_name = user_name;
		}
		if let Some(initialized) = req.initialized {
			row.initialized = initialized;
		}
		if let Some(payday_date) = req.payday_date {
			row.payday_date = Some(payday_date);
		}
		if let Some(payday_frequency) = req.payday_frequency {
			row.payday_frequency = payday_frequency.as_str().to_string();
		}
		if let Some(salary) = req.salary {
			row.salary = salary;
		}
		if let Some(expenses) = req.expenses {
			row.expenses = expenses;
		}
		if let Some(location) = req.location {
			row.location = location;
		}

		queries::update_preferences(&mut tx, &row).await?;
		tx.commit().await?;

		Ok(row.into())
	}
}

/// Fetch the user's preferences row, creating the defaults on first contact.
pub(crate) async fn get_or_create(
	db: &Db,
	cfg: &Config,
	user_id: &str,
) -> Result<models::Preferences> {
	if let Some(row) = queries::fetch_preferences(db, user_id).await? {
		return Ok(row);
	}

	queries::insert_default_preferences(db, &default_row(cfg, user_id)).await?;

	// A concurrent first contact may have won the insert; read back whichever
	// row the conflict rule kept.
	let Some(row) = queries::fetch_preferences(db, user_id).await? else {
		return Err(Error::Storage {
			message: "Preferences row vanished after creation.".to_string(),
		});
	};

	Ok(row)
}

fn default_row(cfg: &Config, user_id: &str) -> models::Preferences {
	models::Preferences {
		id: Uuid::new_v4(),
		user_id: user_id.to_string(),
		agent_name: cfg.identity.agent_name.clone(),
		user_name: "User".to_string(),
		initialized: false,
		payday_date: None,
		payday_frequency: PayFrequency::default().as_str().to_string(),
		salary: 0,
		expenses: 2_000,
		location: "San Francisco, CA".to_string(),
	}
}
