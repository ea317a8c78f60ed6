use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};

/// Sleeps for a random number of milliseconds in `min_delay..=max_delay`.
pub async fn generate_random_delay(min_delay: u64, max_delay: u64) {
    if max_delay == 0 {
        return;
    }

    let delay = if min_delay >= max_delay {
        min_delay
    } else {
        let mut rng = StdRng::from_entropy();
        rng.gen_range(min_delay..=max_delay)
    };

    tracing::debug!(delay_ms = delay, "politeness delay");
    sleep(Duration::from_millis(delay)).await;
}
