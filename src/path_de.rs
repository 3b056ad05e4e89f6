use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

/// Read and parse a JSON file, keeping the failing path in the error.
pub fn read_json_file<T: DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_slice_with_path(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Check {
        #[allow(dead_code)]
        path: String,
        #[allow(dead_code)]
        literal: String,
    }

    #[test]
    fn errors_carry_the_failing_path() {
        let err = from_str_with_path::<Vec<Check>>(r#"[{"path": "a", "literal": 5}]"#).unwrap_err();
        match err {
            Error::Json { path, .. } => assert_eq!(path, "[0].literal"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
