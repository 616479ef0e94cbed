pub mod order_workflow;
