pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_notes.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_notes.sql")),
				"tables/002_tasks.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_tasks.sql")),
				"tables/003_user_preferences.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_user_preferences.sql")),
				"tables/004_chat_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_chat_messages.sql")),
				"tables/005_emotional_metadata.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_emotional_metadata.sql")),
				"tables/006_memory_usage.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_memory_usage.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
