use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use crate::world::World;
use crate::camera::Camera;
use crate::canvas::{ Canvas, Pixel };
use crate::config::RenderConfig;

/// How many row jobs may sit in the queue before the producer blocks.
const JOB_QUEUE_DEPTH: usize = 64;

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns a worker thread that renders rows until the job channel closes.
    ///
    /// Workers pull row indices off the shared job queue, render every pixel
    /// in the row locally, and ship the finished row back on the results
    /// channel. No worker ever touches the canvas; only the coordinator
    /// writes pixels.
    fn new(world: Arc<World>, camera: Arc<Camera>, cfg: RenderConfig,
        jobs: Arc<Mutex<mpsc::Receiver<usize>>>,
        results: mpsc::Sender<(usize, Vec<Pixel>)>) -> Worker {

        let thread = thread::spawn(move || loop {
            // Holding the lock only for the recv; rendering happens unlocked.
            let message = jobs.lock().unwrap().recv();

            let y = match message {
                Ok(y) => y,
                // The job channel is closed; all rows are handed out.
                Err(_) => break,
            };

            let mut row = Vec::with_capacity(camera.hsize);
            for x in 0..camera.hsize {
                let ray = camera.ray_for_pixel(x, y);
                let color = world.color_at(&ray, &cfg, cfg.max_depth);
                row.push(Pixel::from(color));
            }

            if results.send((y, row)).is_err() {
                break;
            }
        });

        Worker { thread: Some(thread) }
    }
}

pub struct ThreadPool {
    workers: Vec<Worker>,
}

impl ThreadPool {
    pub fn new(size: usize, world: Arc<World>, camera: Arc<Camera>,
        cfg: RenderConfig, jobs: Arc<Mutex<mpsc::Receiver<usize>>>,
        results: mpsc::Sender<(usize, Vec<Pixel>)>) -> ThreadPool {
        // There should be at least one thread to run workers.
        assert!(size > 0);

        let mut workers = Vec::with_capacity(size);

        for _ in 0..size {
            workers.push(Worker::new(
                Arc::clone(&world),
                Arc::clone(&camera),
                cfg,
                Arc::clone(&jobs),
                results.clone()
            ));
        }

        ThreadPool { workers }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                thread.join().unwrap();
            }
        }
    }
}

/// Renders the world across `threads` worker threads.
///
/// Rows are dealt out through a bounded job queue, so the producer blocks
/// instead of flooding memory on large canvases. Each row is rendered by
/// exactly one worker, and the coordinator is the only writer to the canvas,
/// so the result is identical to `Camera::render`.
pub fn parallel_render(world: World, camera: Camera, cfg: &RenderConfig,
    threads: usize) -> Canvas {
    let hsize = camera.hsize;
    let vsize = camera.vsize;
    let mut canvas = Canvas::new(hsize, vsize);

    let (job_sender, job_receiver) = mpsc::sync_channel(JOB_QUEUE_DEPTH);
    let (result_sender, result_receiver) = mpsc::channel();

    let world = Arc::new(world);
    let camera = Arc::new(camera);
    let jobs = Arc::new(Mutex::new(job_receiver));

    let pool = ThreadPool::new(threads, world, camera, *cfg, jobs,
        result_sender);

    for y in 0..vsize {
        if job_sender.send(y).is_err() {
            break;
        }
    }

    // Closing the job channel tells the workers to wind down once the
    // remaining rows are drained.
    drop(job_sender);

    // Every worker holds a clone of the result sender; the iterator ends when
    // the last worker exits.
    for (y, row) in result_receiver {
        for (x, pixel) in row.into_iter().enumerate() {
            canvas.write_pixel(x, y, pixel);
        }
    }

    drop(pool);
    canvas
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::coord::Coordinate;
    use crate::matrix::Matrix;
    use crate::light::PointLight;
    use crate::shape::Shape;
    use crate::pattern::Pattern;

    fn sample_world() -> World {
        let mut w = World::empty();
        w.light = PointLight::new(
            Color::rgb(1.0, 1.0, 1.0),
            Coordinate::point(-10.0, 10.0, -10.0),
        );

        let mut s1 = Shape::sphere();
        if let Some(m) = s1.material_mut() {
            m.pattern = Pattern::plain(Color::rgb(0.8, 1.0, 0.6));
            m.diffuse = 0.7;
            m.specular = 0.2;
            m.reflective = 0.3;
        }
        w.shapes.add(s1);

        let mut s2 = Shape::sphere();
        s2.set_transform(Matrix::scaling(0.5, 0.5, 0.5)).unwrap();
        w.shapes.add(s2);

        let mut floor = Shape::plane();
        floor.set_transform(Matrix::translation(0.0, -1.0, 0.0)).unwrap();
        if let Some(m) = floor.material_mut() {
            m.pattern = Pattern::checker(Color::white(), Color::black());
        }
        w.shapes.add(floor);

        w
    }

    fn sample_camera() -> Camera {
        let from = Coordinate::point(0.0, 1.5, -5.0);
        let to = Coordinate::point(0.0, 0.0, 0.0);
        let up = Coordinate::vector(0.0, 1.0, 0.0);

        Camera::new(15, 10, std::f64::consts::PI / 3.0,
            Matrix::view_transform(from, to, up)).unwrap()
    }

    #[test]
    fn parallel_render_matches_sequential() {
        let cfg: RenderConfig = Default::default();
        let w = sample_world();
        let c = sample_camera();

        let sequential = c.render(&w, &cfg);
        let parallel = parallel_render(w, c, &cfg, 4);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn parallel_render_with_single_thread() {
        let cfg: RenderConfig = Default::default();
        let w = sample_world();
        let c = sample_camera();

        let sequential = c.render(&w, &cfg);
        let parallel = parallel_render(w, c, &cfg, 1);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn parallel_render_with_more_threads_than_rows() {
        let cfg: RenderConfig = Default::default();
        let w = sample_world();
        let c = sample_camera();

        let sequential = c.render(&w, &cfg);

        // Surplus workers never receive a job and must still shut down.
        let parallel = parallel_render(w, c, &cfg, 16);

        assert_eq!(parallel, sequential);
    }
}
