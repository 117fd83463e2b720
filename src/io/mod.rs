/// CSV export of episode step records.
pub mod export;
