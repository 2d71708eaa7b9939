pub const DISCLAIMER: &str = "Data is sourced from the network; results are for reference only and their accuracy is not guaranteed.";
