pub mod dispatcher;

pub use dispatcher::DispatcherService;
