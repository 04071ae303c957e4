use super::{
    dto::{CreateBookmarkRequest, EditBookmarkRequest},
    repo_types::{BookmarkChanges, NewBookmark},
};
use crate::errors::AppError;

fn required(field: &str, value: String) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} should not be empty")));
    }
    Ok(value)
}

pub(crate) fn validate_create(req: CreateBookmarkRequest) -> Result<NewBookmark, AppError> {
    Ok(NewBookmark {
        title: required("title", req.title)?,
        link: required("link", req.link)?,
        description: req.description,
    })
}

/// Provided `title`/`link` must still be non-empty.
pub(crate) fn validate_edit(req: EditBookmarkRequest) -> Result<BookmarkChanges, AppError> {
    Ok(BookmarkChanges {
        title: req.title.map(|t| required("title", t)).transpose()?,
        link: req.link.map(|l| required("link", l)).transpose()?,
        description: req.description,
    })
}
