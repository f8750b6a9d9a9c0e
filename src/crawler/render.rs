//! Scroll-to-bottom loop used before reading a rendered document
//!
//! Lazy-loading pages only insert their images once they are scrolled into
//! view. The loop scrolls to the bottom, pauses, and stops as soon as the
//! document height stops growing.

use async_trait::async_trait;
use std::time::Duration;

/// A rendered document that can be scrolled
#[async_trait]
pub trait ScrollTarget: Send + Sync {
    /// Current `document.body.scrollHeight`
    async fn scroll_height(&self) -> Result<i64, String>;

    /// Scrolls the window to the current bottom of the document
    async fn scroll_to_bottom(&self) -> Result<(), String>;
}

/// Scrolls until the page height is stable or `max_scrolls` rounds ran
///
/// # Returns
///
/// Number of scroll rounds performed
pub async fn scroll_until_stable<T: ScrollTarget + ?Sized>(
    target: &T,
    pause: Duration,
    max_scrolls: u32,
) -> Result<u32, String> {
    let mut last_height = target.scroll_height().await?;
    let mut rounds = 0;

    while rounds < max_scrolls {
        target.scroll_to_bottom().await?;
        rounds += 1;

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let new_height = target.scroll_height().await?;
        if new_height == last_height {
            return Ok(rounds);
        }
        tracing::debug!("Page grew from {} to {} px, scrolling again", last_height, new_height);
        last_height = new_height;
    }

    tracing::warn!(
        "Page height still changing after {} scrolls, reading document anyway",
        max_scrolls
    );
    Ok(rounds)
}
