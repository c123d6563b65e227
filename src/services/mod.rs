pub mod providers;
pub mod recommendations;
pub mod watchlist;
