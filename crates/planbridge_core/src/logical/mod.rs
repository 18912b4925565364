pub mod logical_scan;
