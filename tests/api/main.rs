mod health_check;
mod routing;
mod subscriptions;
