pub mod aggregation_task;
pub mod subscription;
pub mod whitelist;
pub mod worker;
