use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayFrequency {
	Weekly,
	#[default]
	BiWeekly,
	Monthly,
}
impl PayFrequency {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Weekly => "weekly",
			Self::BiWeekly => "bi-weekly",
			Self::Monthly => "monthly",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"weekly" => Some(Self::Weekly),
			"bi-weekly" => Some(Self::BiWeekly),
			"monthly" => Some(Self::Monthly),
			_ => None,
		}
	}
}
