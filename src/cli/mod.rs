pub mod buyers_sellers;
pub mod context;
pub mod custody;
pub mod overview;
pub mod periods;
pub mod setup;
pub mod top;
pub mod ui;
pub mod weekly;
