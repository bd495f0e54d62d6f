fn main() {
    #[cfg(feature = "csr")]
    donation_dashboard::start();
}
