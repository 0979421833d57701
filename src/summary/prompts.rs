//! Prompt templates for review summarization.

use crate::models::{Entity, Review};

/// System instruction for the provider.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful assistant that summarizes student reviews for university entities.
Your summaries should be:
- Concise (2-3 sentences maximum)
- Balanced (mention both positives and negatives)
- Factual (based only on the reviews provided)
- Neutral in tone
";

/// Main prompt template for review summarization.
const REVIEW_SUMMARY_PROMPT: &str = "\
Summarize the following reviews for {entity_name} ({entity_type}).

Entity Details:
- Name: {entity_name}
- Type: {entity_type}
- Average Rating: {avg_rating}/5
- Total Reviews: {review_count}

Reviews:
{reviews_text}

Provide a concise 2-3 sentence summary that captures the main sentiment and common themes from these reviews. Focus on the most frequently mentioned aspects.";

/// Template for one formatted review inside the prompt body.
const REVIEW_FORMAT: &str = "Review {index} (Rating: {rating}/5):\n{description}\nTags: {tags}\n";

/// Fixed placeholder written when an entity has no reviews.
pub const NO_REVIEWS_SUMMARY: &str = "No reviews available yet.";

/// Fixed fallback written when the provider fails.
pub const FALLBACK_SUMMARY: &str = "Summary temporarily unavailable.";

/// Format reviews into the prompt body: index, rating, description,
/// comma-joined tags ("None" when a review has no tags).
pub fn format_reviews(reviews: &[Review]) -> String {
    reviews
        .iter()
        .enumerate()
        .map(|(idx, review)| {
            let tags = if review.tags.is_empty() {
                "None".to_string()
            } else {
                review.tags.join(", ")
            };
            REVIEW_FORMAT
                .replace("{index}", &(idx + 1).to_string())
                .replace("{rating}", &review.rating.unwrap_or(0).to_string())
                .replace("{description}", &review.description)
                .replace("{tags}", &tags)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full user prompt for an entity and its reviews.
pub fn render_summary_prompt(entity: &Entity, reviews: &[Review]) -> String {
    REVIEW_SUMMARY_PROMPT
        .replace("{entity_name}", &entity.name)
        .replace("{entity_type}", entity.entity_type.as_str())
        .replace("{avg_rating}", &entity.avg_rating.to_string())
        .replace("{review_count}", &reviews.len().to_string())
        .replace("{reviews_text}", &format_reviews(reviews))
}
