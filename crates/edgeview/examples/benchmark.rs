use edgeview::EdgeProcessor;
use std::time::Instant;

fn main() {
    edgeview::logging::init_with_filter("warn");

    let processor = EdgeProcessor::new();
    println!("Pipeline parameters: {:?}", processor.config());

    // Create test frame (640x480, NV21)
    let test_width = 640i32;
    let test_height = 480i32;
    let frame_size = match EdgeProcessor::expected_frame_size(test_width, test_height) {
        Some(n) => n,
        None => {
            eprintln!("Invalid benchmark dimensions");
            std::process::exit(1);
        }
    };
    let mut frame_data = vec![128u8; frame_size];

    // Fill luma with a checkerboard over a gradient for more interesting input
    for y in 0..test_height as usize {
        for x in 0..test_width as usize {
            let idx = y * test_width as usize + x;
            let base = ((x + y) % 256) as u8;
            frame_data[idx] = if (x / 40 + y / 40) % 2 == 0 { base / 2 } else { 255 - base / 2 };
        }
    }

    println!("\nRunning warmup pass...");
    if let Err(e) = processor.process_frame(&frame_data, test_width, test_height) {
        eprintln!("Warmup failed: {}", e);
        std::process::exit(1);
    }

    let iterations = 10;
    println!("\nBenchmarking {} frames at {}x{}...", iterations, test_width, test_height);
    let mut total_time = 0u128;

    for i in 0..iterations {
        let start = Instant::now();
        let stats = match processor.process_frame_with_stats(&frame_data, test_width, test_height) {
            Ok((_, stats)) => stats,
            Err(e) => {
                eprintln!("Frame {} failed: {}", i, e);
                std::process::exit(1);
            }
        };
        let elapsed = start.elapsed();
        total_time += elapsed.as_micros();

        println!("\nFrame {}: {:?}", i, elapsed);
        println!("  Extract:     {:6} μs", stats.extract_us);
        println!("  Blur:        {:6} μs", stats.blur_us);
        println!("  Canny:       {:6} μs", stats.canny_us);
        println!("  Total:       {:6} μs", stats.total_us);
        println!("  Edge pixels: {}", stats.edge_pixels);
    }

    let avg_time = total_time / iterations;
    let fps = 1_000_000.0 / avg_time.max(1) as f64;

    println!("\n=== Results ===");
    println!("Average latency: {} μs ({:.2} ms)", avg_time, avg_time as f64 / 1000.0);
    println!("Throughput: {:.1} FPS", fps);
}
