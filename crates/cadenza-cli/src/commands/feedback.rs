/// Message shown when a user marks a recommendation as good.
pub const FEEDBACK_ACK: &str = "Thanks for your feedback!";

/// Acknowledge feedback. Nothing is recorded.
pub fn acknowledge_feedback() {
    println!("🎯 {FEEDBACK_ACK}");
}
