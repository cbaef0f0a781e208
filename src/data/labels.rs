use std::path::Path;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("file name {file_name:?} does not start with an integer label followed by '_'")]
    Malformed { file_name: String },

    #[error("path {0:?} has no usable file name")]
    MissingFileName(String),
}

/// Reads the ground-truth label encoded before the first underscore of a file name,
/// e.g. `3_sample.jpg` is labeled `3`.
pub fn parse_label(file_name: &str) -> Result<usize, LabelError> {
    let prefix = file_name.split('_').next().unwrap_or_default();
    prefix.parse().map_err(|_| LabelError::Malformed {
        file_name: file_name.to_owned(),
    })
}

pub fn label_from_path(path: &Path) -> Result<usize, LabelError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LabelError::MissingFileName(path.display().to_string()))?;
    parse_label(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_prefix_before_first_underscore() {
        assert_eq!(parse_label("3_sample.jpg"), Ok(3));
        assert_eq!(parse_label("12_cat_2.png"), Ok(12));
    }

    #[test]
    fn rejects_non_numeric_prefix() {
        assert_eq!(
            parse_label("abc_x.jpg"),
            Err(LabelError::Malformed {
                file_name: "abc_x.jpg".into()
            })
        );
    }

    #[test]
    fn rejects_name_without_separator() {
        assert!(parse_label("7.jpg").is_err());
        assert!(parse_label("").is_err());
    }

    #[test]
    fn label_from_nested_path() {
        let path = Path::new("fixture/test_images/2_b.jpg");
        assert_eq!(label_from_path(path), Ok(2));
    }
}
