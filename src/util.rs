use crate::model::Author;

pub fn path_matches(path: &str, path_prefix: Option<&str>) -> bool {
    match path_prefix {
        Some(prefix) => path.starts_with(prefix),
        None => true,
    }
}

/// Case-insensitive substring match against an author's name or email.
pub fn author_matches(author: &Author, pattern: Option<&str>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    let pattern = pattern.to_lowercase();
    author.name.to_lowercase().contains(&pattern) || author.email.to_lowercase().contains(&pattern)
}

pub fn authors_matching<'a>(
    authors: &'a [Author],
    pattern: Option<&'a str>,
) -> impl Iterator<Item = &'a Author> + 'a {
    authors.iter().filter(move |a| author_matches(a, pattern))
}
