pub mod request;
#[cfg(test)]
pub mod test_server;
