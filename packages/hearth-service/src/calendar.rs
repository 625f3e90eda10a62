use crate::HearthService;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CalendarEvent {
	pub id: u32,
	pub title: String,
	pub date: String,
	pub time: String,
	#[serde(rename = "type")]
	pub kind: EventKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Meeting,
	Call,
}

impl HearthService {
	/// The calendar is demo furniture: a fixed schedule, nothing stored.
	pub fn calendar_events(&self) -> Vec<CalendarEvent> {
		vec![
			CalendarEvent {
				id: 1,
				title: "Team Standup".to_string(),
				date: "2025-06-04".to_string(),
				time: "09:00".to_string(),
				kind: EventKind::Meeting,
			},
			CalendarEvent {
				id: 2,
				title: "Project Review".to_string(),
				date: "2025-06-04".to_string(),
				time: "14:00".to_string(),
				kind: EventKind::Meeting,
			},
			CalendarEvent {
				id: 3,
				title: "Client Call".to_string(),
				date: "2025-06-05".to_string(),
				time: "11:00".to_string(),
				kind: EventKind::Call,
			},
		]
	}
}
