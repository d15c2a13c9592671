use crate::action::{ActionCategory, Priority, TimeEstimate};
use std::collections::HashMap;

/// (category, subtype) identity of a classified issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueKey {
    pub category: &'static str,
    pub subtype: &'static str,
}

impl IssueKey {
    pub const fn new(category: &'static str, subtype: &'static str) -> Self {
        Self { category, subtype }
    }

    /// Catch-all for warnings no pattern recognizes
    pub const UNKNOWN: IssueKey = IssueKey::new("unknown", "issue");

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

/// Remediation template for one issue kind
#[derive(Debug, Clone)]
pub struct Remediation {
    pub priority: Priority,
    /// Grouping shown to people, e.g. `Basic SEO`
    pub label: &'static str,
    pub category: ActionCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub implementation: &'static [&'static str],
    pub expected_impact: &'static str,
    pub time_estimate: TimeEstimate,
}

/// Warning phrasings, matched in order against the lowercased warning.
/// Anchor phrasings come first because they also contain `missing title`.
const PATTERNS: &[(&str, IssueKey)] = &[
    ("anchor missing title tag", IssueKey::new("links", "missing_title")),
    ("anchor text contains generic text", IssueKey::new("links", "generic_text")),
    ("missing title", IssueKey::new("title", "missing")),
    ("title tag is too short", IssueKey::new("title", "too_short")),
    ("title tag is too long", IssueKey::new("title", "too_long")),
    ("missing description", IssueKey::new("description", "missing")),
    ("description is too short", IssueKey::new("description", "too_short")),
    ("description is too long", IssueKey::new("description", "too_long")),
    ("should have at least one h1", IssueKey::new("headings", "missing_h1")),
    ("more than one h1", IssueKey::new("headings", "multiple_h1")),
    ("number of h2 tags is outside", IssueKey::new("headings", "h2_out_of_range")),
    ("image missing alt tag", IssueKey::new("images", "missing_alt")),
    ("missing og:title", IssueKey::new("open_graph", "missing_og_title")),
    ("missing og:description", IssueKey::new("open_graph", "missing_og_description")),
    ("missing og:image", IssueKey::new("open_graph", "missing_og_image")),
];

/// Immutable classification patterns and remediation table
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    patterns: Vec<(&'static str, IssueKey)>,
    remediations: HashMap<IssueKey, Remediation>,
    fallback: Remediation,
    /// Estimates at or below this many minutes count as low effort
    pub low_effort_minutes: u32,
}

impl RuleCatalog {
    /// Patterns in match order
    pub fn patterns(&self) -> &[(&'static str, IssueKey)] {
        &self.patterns
    }

    /// Remediation for a key; unknown keys get the manual-review entry
    pub fn remediation(&self, key: &IssueKey) -> &Remediation {
        self.remediations.get(key).unwrap_or(&self.fallback)
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        let entries = [
            (
                IssueKey::new("title", "missing"),
                Remediation {
                    priority: Priority::Critical,
                    label: "Basic SEO",
                    category: ActionCategory::Technical,
                    title: "Add a page title",
                    description: "The page has no title tag, the most basic SEO element",
                    action: "Add a descriptive title tag to the page",
                    implementation: &[
                        "Add a <title> tag inside <head>",
                        "Keep the title between 50 and 60 characters",
                        "Include the main keyword without stuffing",
                        "Make sure the title describes the page content",
                    ],
                    expected_impact: "Helps search engines understand the page and noticeably improves rankings",
                    time_estimate: TimeEstimate::Minutes(15),
                },
            ),
            (
                IssueKey::new("title", "too_short"),
                Remediation {
                    priority: Priority::High,
                    label: "Content",
                    category: ActionCategory::Content,
                    title: "Lengthen the page title",
                    description: "The title is too short to describe the page",
                    action: "Expand the title with relevant keywords",
                    implementation: &[
                        "Identify the page topic and target keywords",
                        "Expand the title to 30-60 characters",
                        "Add the brand or site name",
                        "Keep the title concise and clear",
                    ],
                    expected_impact: "Improves click-through rate and search engine understanding",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("title", "too_long"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Content",
                    category: ActionCategory::Content,
                    title: "Shorten the page title",
                    description: "The title is long enough to be truncated in search results",
                    action: "Trim the title down to its core keywords",
                    implementation: &[
                        "Identify the core keywords in the title",
                        "Remove filler words",
                        "Keep the title under 60 characters",
                        "Check the title still reads well when truncated",
                    ],
                    expected_impact: "Titles display in full in search results",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("description", "missing"),
                Remediation {
                    priority: Priority::Critical,
                    label: "Basic SEO",
                    category: ActionCategory::Technical,
                    title: "Add a meta description",
                    description: "The page has no meta description, which weakens its search snippet",
                    action: "Write a compelling meta description",
                    implementation: &[
                        "Add a meta description tag inside <head>",
                        "Keep the description between 150 and 160 characters",
                        "Include the main keyword and the page's value",
                        "Write copy that invites the click",
                    ],
                    expected_impact: "Raises click-through rate from search results",
                    time_estimate: TimeEstimate::Minutes(20),
                },
            ),
            (
                IssueKey::new("description", "too_short"),
                Remediation {
                    priority: Priority::High,
                    label: "Content",
                    category: ActionCategory::Content,
                    title: "Expand the meta description",
                    description: "The description is too short to show what the page offers",
                    action: "Expand the description and make it more inviting",
                    implementation: &[
                        "List the page's main selling points",
                        "Expand the description to 120-160 characters",
                        "Add a call to action",
                        "Include relevant long-tail keywords",
                    ],
                    expected_impact: "Makes the search snippet more attractive",
                    time_estimate: TimeEstimate::Minutes(15),
                },
            ),
            (
                IssueKey::new("description", "too_long"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Content",
                    category: ActionCategory::Content,
                    title: "Shorten the meta description",
                    description: "The description will be truncated in search results",
                    action: "Cut the description down to its key message",
                    implementation: &[
                        "Identify the key message",
                        "Remove redundant phrases",
                        "Keep the description under 160 characters",
                        "Check the truncated form still makes sense",
                    ],
                    expected_impact: "Descriptions display in full in search results",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("headings", "missing_h1"),
                Remediation {
                    priority: Priority::Critical,
                    label: "Structure",
                    category: ActionCategory::Content,
                    title: "Add an H1 heading",
                    description: "The page has no H1, which hurts its structure and SEO",
                    action: "Give the page a single H1 heading",
                    implementation: &[
                        "Add an H1 at the top of the main content",
                        "Use exactly one H1 per page",
                        "Summarize the page topic in the H1",
                        "Include the main target keyword",
                    ],
                    expected_impact: "Clearer structure for readers and search engines",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("headings", "multiple_h1"),
                Remediation {
                    priority: Priority::High,
                    label: "Structure",
                    category: ActionCategory::Content,
                    title: "Keep a single H1 heading",
                    description: "The page has several H1 headings competing for the main topic",
                    action: "Demote extra H1 headings to H2 or lower",
                    implementation: &[
                        "Pick the heading that best states the page topic",
                        "Change the other H1 elements to H2 or H3",
                        "Check the heading outline still reads in order",
                    ],
                    expected_impact: "A clear main topic for search engines",
                    time_estimate: TimeEstimate::Minutes(15),
                },
            ),
            (
                IssueKey::new("headings", "h2_out_of_range"),
                Remediation {
                    priority: Priority::Low,
                    label: "Structure",
                    category: ActionCategory::Content,
                    title: "Rebalance H2 subheadings",
                    description: "The number of H2 subheadings is outside the recommended range",
                    action: "Split or merge sections so the H2 count fits the content",
                    implementation: &[
                        "Outline the page's sections",
                        "Add H2 headings to long unbroken sections",
                        "Merge thin sections that each have their own H2",
                    ],
                    expected_impact: "Easier scanning for readers and clearer topic structure",
                    time_estimate: TimeEstimate::Minutes(20),
                },
            ),
            (
                IssueKey::new("images", "missing_alt"),
                Remediation {
                    priority: Priority::High,
                    label: "Accessibility",
                    category: ActionCategory::UserExperience,
                    title: "Add image alt attributes",
                    description: "Images without alt attributes hurt accessibility and SEO",
                    action: "Give every image a descriptive alt attribute",
                    implementation: &[
                        "List every img tag on the page",
                        "Add an alt attribute to each image",
                        "Describe what the image shows",
                        "Use an empty alt for decorative images",
                    ],
                    expected_impact: "Better accessibility and image search rankings",
                    time_estimate: TimeEstimate::Minutes(30),
                },
            ),
            (
                IssueKey::new("links", "missing_title"),
                Remediation {
                    priority: Priority::Medium,
                    label: "User Experience",
                    category: ActionCategory::UserExperience,
                    title: "Add link title attributes",
                    description: "Links without a title attribute give readers less context",
                    action: "Add title attributes to important links",
                    implementation: &[
                        "Identify the page's important links",
                        "Add a descriptive title attribute to each",
                        "Say where the link leads",
                        "Avoid repeating the link text",
                    ],
                    expected_impact: "Better usability and accessibility",
                    time_estimate: TimeEstimate::Minutes(20),
                },
            ),
            (
                IssueKey::new("links", "generic_text"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Content",
                    category: ActionCategory::Content,
                    title: "Use descriptive link text",
                    description: "Links use generic text that tells search engines nothing",
                    action: "Replace generic anchor text with descriptive text",
                    implementation: &[
                        "Find links with generic text",
                        "Replace phrases like \"click here\" with descriptive text",
                        "Describe the target page in the link text",
                        "Include relevant keywords",
                    ],
                    expected_impact: "Link value passes on and readers know where links go",
                    time_estimate: TimeEstimate::Minutes(25),
                },
            ),
            (
                IssueKey::new("open_graph", "missing_og_title"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Social Media",
                    category: ActionCategory::StructuredData,
                    title: "Add an Open Graph title",
                    description: "Without og:title, social shares fall back to guessed titles",
                    action: "Add an og:title meta tag",
                    implementation: &[
                        "Add <meta property=\"og:title\" content=\"...\"> inside <head>",
                        "Reuse or adapt the page title",
                        "Write the title for social audiences",
                        "Keep it under 60 characters",
                    ],
                    expected_impact: "Better looking social media shares",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("open_graph", "missing_og_description"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Social Media",
                    category: ActionCategory::StructuredData,
                    title: "Add an Open Graph description",
                    description: "Without og:description, social shares lack a summary",
                    action: "Add an og:description meta tag",
                    implementation: &[
                        "Add <meta property=\"og:description\" content=\"...\"> inside <head>",
                        "Reuse the meta description if it fits",
                        "Write the description for social audiences",
                        "Keep it under 200 characters",
                    ],
                    expected_impact: "More engaging social media shares",
                    time_estimate: TimeEstimate::Minutes(10),
                },
            ),
            (
                IssueKey::new("open_graph", "missing_og_image"),
                Remediation {
                    priority: Priority::Medium,
                    label: "Social Media",
                    category: ActionCategory::StructuredData,
                    title: "Add an Open Graph image",
                    description: "Without og:image, social shares have no preview picture",
                    action: "Add an og:image meta tag",
                    implementation: &[
                        "Choose or create a share image",
                        "Size the image at 1200x630 pixels",
                        "Add <meta property=\"og:image\" content=\"...\"> inside <head>",
                        "Make sure the image URL is publicly reachable",
                    ],
                    expected_impact: "Much more visual social media shares",
                    time_estimate: TimeEstimate::Minutes(30),
                },
            ),
        ];

        Self {
            patterns: PATTERNS.to_vec(),
            remediations: entries.into_iter().collect(),
            fallback: Remediation {
                priority: Priority::Medium,
                label: "Other",
                category: ActionCategory::Technical,
                title: "Issue needing attention",
                description: "A page warning that matches no known rule",
                action: "Review this issue manually and resolve it",
                implementation: &["Analyze the specific problem", "Decide on a fix", "Apply the fix"],
                expected_impact: "Improves page quality",
                time_estimate: TimeEstimate::ToBeAssessed,
            },
            low_effort_minutes: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_has_a_remediation() {
        let catalog = RuleCatalog::default();
        for (_, key) in catalog.patterns() {
            assert!(catalog.remediations.contains_key(key), "no remediation for {key:?}");
        }
        assert_eq!(catalog.remediations.len(), catalog.patterns().len());
    }

    #[test]
    fn test_priorities_and_estimates() {
        let catalog = RuleCatalog::default();
        let check = |category, subtype, priority, minutes| {
            let remediation = catalog.remediation(&IssueKey::new(category, subtype));
            assert_eq!(remediation.priority, priority, "{category}/{subtype}");
            assert_eq!(remediation.time_estimate, TimeEstimate::Minutes(minutes));
        };
        check("title", "missing", Priority::Critical, 15);
        check("description", "missing", Priority::Critical, 20);
        check("headings", "multiple_h1", Priority::High, 15);
        check("headings", "h2_out_of_range", Priority::Low, 20);
        check("images", "missing_alt", Priority::High, 30);
        check("links", "generic_text", Priority::Medium, 25);
        check("open_graph", "missing_og_image", Priority::Medium, 30);
    }

    #[test]
    fn test_unknown_falls_back_to_manual_review() {
        let catalog = RuleCatalog::default();
        let fallback = catalog.remediation(&IssueKey::UNKNOWN);
        assert_eq!(fallback.priority, Priority::Medium);
        assert_eq!(fallback.time_estimate, TimeEstimate::ToBeAssessed);
        assert!(fallback.action.contains("manually"));
    }
}
