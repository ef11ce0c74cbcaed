//! meetup-sidebar: rebuilds the weekly meetup calendar from flair-tagged
//! postings and publishes it to Google Calendar and the subreddit sidebar.

pub mod commands;
pub mod config;
pub mod reddit;
