mod options;
mod property_partition;
