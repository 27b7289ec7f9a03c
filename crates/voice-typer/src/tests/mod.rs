mod config;
mod notifier;
