mod helpers;
mod orders;
mod reports;
