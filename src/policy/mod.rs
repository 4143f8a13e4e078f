pub mod byte_lru;
