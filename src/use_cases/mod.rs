pub mod login;
pub mod password;
pub mod register;
pub mod sessions;

#[cfg(test)]
pub(crate) mod test_support;
