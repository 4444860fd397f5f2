//! Route definitions for the recall server

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "Index page"),
    // Recall API
    ("POST", "/get_vehicle_data", "Save the selected vehicle"),
    ("POST", "/get_chart", "Render a recall chart as PNG"),
    ("POST", "/chatbot", "Ask a question about the vehicle's recalls"),
    // Info
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/charts", "Available chart types"),
];

/// Print all routes
pub fn print_routes() {
    println!("\nrecall-web routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:20} {}", method, path, desc);
    }
    println!();
}
