use crate::utils;

/// Builds the ordered search query plan for one track.
///
/// Queries go from most specific to loosest: the raw title/artist pair, the
/// normalized pair, the parenthetical-stripped title with and without the
/// artist, and finally the artist alone. Duplicates and empty queries are
/// dropped while preserving order, so the plan always holds between two and
/// five entries for non-empty inputs.
pub fn track_queries(title: &str, artist: &str) -> Vec<String> {
    let title = title.trim();
    let artist = artist.trim();
    let stripped = utils::strip_parentheticals(title);

    let mut queries: Vec<String> = Vec::with_capacity(5);
    push_query(&mut queries, format!("{} {}", title, artist));
    push_query(
        &mut queries,
        format!("{} {}", utils::normalize(title), utils::normalize(artist)),
    );
    if stripped != title {
        push_query(&mut queries, format!("{} {}", stripped, artist));
    }
    push_query(&mut queries, stripped);
    push_query(&mut queries, artist.to_string());
    queries
}

/// Builds the ordered search query plan for an album lookup.
///
/// Album queries use the cleaned title and artist because catalogs disagree
/// on release annotations even more than on track titles. The normalized
/// variant is appended as a fallback when it differs.
pub fn album_queries(title: &str, artist: &str) -> Vec<String> {
    let clean_title = utils::clean_title(title);
    let clean_artist = utils::clean_artist(artist);

    let mut queries: Vec<String> = Vec::with_capacity(2);
    push_query(&mut queries, format!("{} {}", clean_title, clean_artist));
    push_query(
        &mut queries,
        format!(
            "{} {}",
            utils::normalize(&clean_title),
            utils::normalize(&clean_artist)
        ),
    );
    queries
}

fn push_query(queries: &mut Vec<String>, query: String) {
    let query = query.trim().to_string();
    if !query.is_empty() && !queries.contains(&query) {
        queries.push(query);
    }
}
