pub const DEFAULT_EVERY_N_PURCHASES: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardProgress{
    pub purchases_count: i32,
    pub every_n_purchases: i32
}

impl RewardProgress {
    // A non-positive rule would divide by zero, fall back to the default cadence
    pub fn new(purchases_count: i32, every_n_purchases: Option<i32>) -> Self {
        let every_n_purchases = every_n_purchases
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_EVERY_N_PURCHASES);

        Self{
            purchases_count: purchases_count.max(0),
            every_n_purchases
        }
    }

    pub fn has_available_reward(&self) -> bool {
        self.purchases_count >= self.every_n_purchases
            && self.purchases_count % self.every_n_purchases == 0
    }

    pub fn missing_purchases(&self) -> i32 {
        self.every_n_purchases - (self.purchases_count % self.every_n_purchases)
    }

    pub fn purchases_until_reward(&self) -> i32 {
        if self.has_available_reward() {
            0
        } else {
            self.missing_purchases()
        }
    }
}
