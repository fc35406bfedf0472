use script_config_test::execute_integration_test;

#[test]
fn main() {
    execute_integration_test(|result| {
        if let Err(reason) = result {
            panic!("script-config integration test failed: {}", reason);
        }
    });
}
