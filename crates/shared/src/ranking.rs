use crate::models::Story;

/// Keep only stories that link somewhere off-site.
pub fn with_external_url(stories: Vec<Story>) -> Vec<Story> {
    stories
        .into_iter()
        .filter(|story| story.external_url().is_some())
        .collect()
}

/// Most-discussed first, truncated to `limit`. Ties keep their input order.
pub fn rank(mut stories: Vec<Story>, limit: usize) -> Vec<Story> {
    // sort_by_key is stable
    stories.sort_by_key(|story| std::cmp::Reverse(story.descendants));
    stories.truncate(limit);
    stories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, url: Option<&str>, descendants: u64) -> Story {
        Story {
            id,
            title: Some(format!("Story {}", id)),
            url: url.map(str::to_string),
            descendants,
        }
    }

    fn ids(stories: &[Story]) -> Vec<u64> {
        stories.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_filter_drops_self_posts_and_empty_urls() {
        let stories = vec![
            story(1, Some("https://a.example"), 3),
            story(2, None, 100),
            story(3, Some(""), 50),
            story(4, Some("https://b.example"), 0),
        ];

        let kept = with_external_url(stories);
        assert_eq!(ids(&kept), vec![1, 4]);
        assert!(kept.iter().all(|s| s.external_url().is_some()));
    }

    #[test]
    fn test_rank_descending() {
        let stories = vec![
            story(1, Some("u"), 10),
            story(2, Some("u"), 300),
            story(3, Some("u"), 42),
        ];
        assert_eq!(ids(&rank(stories, 5)), vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let stories = vec![
            story(7, Some("u"), 5),
            story(3, Some("u"), 9),
            story(9, Some("u"), 5),
            story(1, Some("u"), 5),
        ];
        assert_eq!(ids(&rank(stories, 4)), vec![3, 7, 9, 1]);
    }

    #[test]
    fn test_rank_truncates() {
        let stories = (1..=10).map(|i| story(i, Some("u"), i)).collect();
        let ranked = rank(stories, 3);
        assert_eq!(ids(&ranked), vec![10, 9, 8]);
    }

    #[test]
    fn test_fewer_than_limit_is_not_an_error() {
        let stories = vec![story(1, Some("u"), 1), story(2, Some("u"), 2)];
        assert_eq!(rank(stories, 5).len(), 2);
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
