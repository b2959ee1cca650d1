use std::fmt;

/// Relevance categories searched in one batch, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Mentioned,
    ReviewRequested,
    TeamAuthored,
    TeamMentioned,
    TeamReviewRequested,
}

impl Category {
    /// Fixed order in which categories are visited during aggregation.
    pub const ALL: [Category; 5] = [
        Category::Mentioned,
        Category::ReviewRequested,
        Category::TeamAuthored,
        Category::TeamMentioned,
        Category::TeamReviewRequested,
    ];

    /// GraphQL alias (and variable name) used for this category's search.
    pub fn alias(&self) -> &'static str {
        match self {
            Category::Mentioned => "mentioned",
            Category::ReviewRequested => "reviewRequested",
            Category::TeamAuthored => "teamAuthored",
            Category::TeamMentioned => "teamMentioned",
            Category::TeamReviewRequested => "teamReviewRequested",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Mentioned => "mentioned",
            Category::ReviewRequested => "review requested",
            Category::TeamAuthored => "team authored",
            Category::TeamMentioned => "team mentioned",
            Category::TeamReviewRequested => "team review requested",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Default)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    /// Start from the filters shared by every category: open, non-archived
    /// pull requests in `org`.
    pub fn open_prs_in(org: &str) -> Self {
        let mut builder = Self::default();
        builder
            .term("is:open")
            .term("is:pr")
            .term(format!("org:{}", org))
            .term("archived:false");
        builder
    }

    pub fn not_draft(&mut self) -> &mut Self {
        self.term("draft:false")
    }

    pub fn author(&mut self, login: &str) -> &mut Self {
        self.term(format!("author:{}", login))
    }

    pub fn review_requested(&mut self, login: &str) -> &mut Self {
        self.term(format!("review-requested:{}", login))
    }

    pub fn mentions(&mut self, login: &str) -> &mut Self {
        self.term(format!("mentions:{}", login))
    }

    pub fn team(&mut self, org: &str, team: &str) -> &mut Self {
        self.term(format!("team:{}/{}", org, team))
    }

    pub fn team_review_requested(&mut self, org: &str, team: &str) -> &mut Self {
        self.term(format!("team-review-requested:{}/{}", org, team))
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }

    fn term(&mut self, term: impl Into<String>) -> &mut Self {
        self.terms.push(term.into());
        self
    }
}

/// The five search strings of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQueries {
    pub mentioned: String,
    pub review_requested: String,
    pub team_authored: String,
    pub team_mentioned: String,
    pub team_review_requested: String,
    /// False when there are no teammates. The team-authored search then has
    /// no author predicate and must not return anything.
    pub has_teammates: bool,
}

impl SearchQueries {
    pub fn build(login: &str, org: &str, team: &str, teammates: &[String]) -> Self {
        let mut team_authored = SearchQueryBuilder::open_prs_in(org);
        team_authored.not_draft();
        for teammate in teammates {
            team_authored.author(teammate);
        }

        Self {
            mentioned: SearchQueryBuilder::open_prs_in(org).mentions(login).build(),
            review_requested: SearchQueryBuilder::open_prs_in(org)
                .review_requested(login)
                .build(),
            team_authored: team_authored.build(),
            team_mentioned: SearchQueryBuilder::open_prs_in(org).team(org, team).build(),
            team_review_requested: SearchQueryBuilder::open_prs_in(org)
                .team_review_requested(org, team)
                .build(),
            has_teammates: !teammates.is_empty(),
        }
    }

    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Mentioned => &self.mentioned,
            Category::ReviewRequested => &self.review_requested,
            Category::TeamAuthored => &self.team_authored,
            Category::TeamMentioned => &self.team_mentioned,
            Category::TeamReviewRequested => &self.team_review_requested,
        }
    }

    /// Number of results to request for `category`, capped at `page_size`.
    pub fn limit(&self, category: Category, page_size: u32) -> u32 {
        if category == Category::TeamAuthored && !self.has_teammates {
            0
        } else {
            page_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teammates(logins: &[&str]) -> Vec<String> {
        logins.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_personal_queries() {
        let queries = SearchQueries::build("me", "acme", "core", &teammates(&["alice"]));

        assert_eq!(
            queries.review_requested,
            "is:open is:pr org:acme archived:false review-requested:me"
        );
        assert_eq!(
            queries.mentioned,
            "is:open is:pr org:acme archived:false mentions:me"
        );
    }

    #[test]
    fn test_build_team_queries() {
        let queries = SearchQueries::build("me", "acme", "core", &[]);

        assert_eq!(
            queries.team_mentioned,
            "is:open is:pr org:acme archived:false team:acme/core"
        );
        assert_eq!(
            queries.team_review_requested,
            "is:open is:pr org:acme archived:false team-review-requested:acme/core"
        );
    }

    #[test]
    fn test_team_authored_repeats_author_predicate() {
        let queries = SearchQueries::build("me", "acme", "core", &teammates(&["alice", "bob"]));

        assert_eq!(
            queries.team_authored,
            "is:open is:pr org:acme archived:false draft:false author:alice author:bob"
        );
        assert!(queries.has_teammates);
        assert_eq!(queries.limit(Category::TeamAuthored, 100), 100);
    }

    #[test]
    fn test_empty_teammates_has_no_author_and_zero_limit() {
        let queries = SearchQueries::build("me", "acme", "core", &[]);

        assert!(!queries.team_authored.contains("author:"));
        assert!(!queries.has_teammates);
        assert_eq!(queries.limit(Category::TeamAuthored, 100), 0);
        assert_eq!(queries.limit(Category::Mentioned, 100), 100);
    }

    #[test]
    fn test_get_matches_fields() {
        let queries = SearchQueries::build("me", "acme", "core", &teammates(&["alice"]));
        for category in Category::ALL {
            assert!(queries.get(category).starts_with("is:open is:pr org:acme"));
        }
        assert_eq!(queries.get(Category::TeamAuthored), queries.team_authored);
    }

    #[test]
    fn test_category_order_and_aliases() {
        let aliases: Vec<&str> = Category::ALL.iter().map(Category::alias).collect();
        assert_eq!(
            aliases,
            vec![
                "mentioned",
                "reviewRequested",
                "teamAuthored",
                "teamMentioned",
                "teamReviewRequested"
            ]
        );
    }
}
