// Built-in OAuth1 provider descriptors and their profile normalizers.

pub mod twitter;
