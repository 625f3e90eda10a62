pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("{name} is not configured. Set the {name} environment variable or the matching \
	         providers key in the config file.")]
	MissingCredential { name: &'static str },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<hearth_storage::Error> for Error {
	fn from(err: hearth_storage::Error) -> Self {
		match err {
			hearth_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			hearth_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<hearth_providers::Error> for Error {
	fn from(err: hearth_providers::Error) -> Self {
		match err {
			hearth_providers::Error::MissingCredential { name } => Self::MissingCredential { name },
			other => Self::Upstream { message: other.to_string() },
		}
	}
}
