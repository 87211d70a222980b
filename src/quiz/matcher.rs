use super::domain::ResultBucket;

/// Pick the first bucket whose inclusive range holds `score`.
///
/// Adjacent buckets share their boundary, and the earlier bucket claims it. Scores outside
/// every range land in the first bucket. Bucket ranges are author-supplied data, so the
/// fallback hides misconfiguration; [`validate_buckets`] is the place to catch it.
pub fn match_bucket(score: f64, buckets: &[ResultBucket]) -> Option<&ResultBucket> {
    buckets
        .iter()
        .find(|bucket| bucket.contains(score))
        .or_else(|| buckets.first())
}

/// Configuration problems in a quiz's result buckets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BucketConfigError {
    #[error("no result buckets configured")]
    Empty,
    #[error("bucket '{title}' has an invalid range {min}..={max}")]
    InvalidRange { title: String, min: f64, max: f64 },
    #[error("buckets '{first}' and '{second}' overlap or are out of order")]
    Overlap { first: String, second: String },
    #[error("scores between {after} and {before} match no bucket")]
    Gap { after: f64, before: f64 },
    #[error("lowest bucket starts at {start}, above the minimum score {expected}")]
    LowerBoundUncovered { start: f64, expected: f64 },
    #[error("highest bucket ends at {end}, below the maximum score {expected}")]
    UpperBoundUncovered { end: f64, expected: f64 },
}

/// Check that `buckets`, in the order they are listed, tile `[lowest, highest]`.
///
/// Each bucket must start exactly where the previous one ends. Any space between two bounds
/// is a gap, however small.
pub fn validate_buckets(
    buckets: &[ResultBucket],
    lowest: f64,
    highest: f64,
) -> Result<(), BucketConfigError> {
    if buckets.is_empty() {
        return Err(BucketConfigError::Empty);
    }

    for bucket in buckets {
        let finite = bucket.min_score.is_finite() && bucket.max_score.is_finite();
        if !finite || bucket.min_score > bucket.max_score {
            return Err(BucketConfigError::InvalidRange {
                title: bucket.title.clone(),
                min: bucket.min_score,
                max: bucket.max_score,
            });
        }
    }

    for pair in buckets.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.min_score < previous.max_score {
            return Err(BucketConfigError::Overlap {
                first: previous.title.clone(),
                second: next.title.clone(),
            });
        }
        if next.min_score > previous.max_score {
            return Err(BucketConfigError::Gap {
                after: previous.max_score,
                before: next.min_score,
            });
        }
    }

    let lowest_bucket = &buckets[0];
    if lowest_bucket.min_score > lowest {
        return Err(BucketConfigError::LowerBoundUncovered {
            start: lowest_bucket.min_score,
            expected: lowest,
        });
    }

    let highest_bucket = &buckets[buckets.len() - 1];
    if highest_bucket.max_score < highest {
        return Err(BucketConfigError::UpperBoundUncovered {
            end: highest_bucket.max_score,
            expected: highest,
        });
    }

    Ok(())
}
