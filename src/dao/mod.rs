mod subscription;

pub use subscription::SubscriptionRegistry;
