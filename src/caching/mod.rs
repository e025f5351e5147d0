pub mod redis;

pub use redis::RedisClient;
